use crate::types::{MediaItem, MediaKind};

/// A source of media items for a company.
///
/// Implementations perform one blocking lookup per call. Results for the
/// same `(company_id, kind)` may be merged into a cache repeatedly, so
/// returned ids must be stable across calls.
pub trait MediaFetcher {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every item of `kind` credited to `company_id`.
    fn fetch(&self, company_id: &str, kind: MediaKind) -> Result<Vec<MediaItem>, Self::Error>;
}

impl<F: MediaFetcher + ?Sized> MediaFetcher for &F {
    type Error = F::Error;

    fn fetch(&self, company_id: &str, kind: MediaKind) -> Result<Vec<MediaItem>, Self::Error> {
        (**self).fetch(company_id, kind)
    }
}
