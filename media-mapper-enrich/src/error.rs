use media_mapper_core::{CatalogError, MediaKind};

/// Errors that stop an enrichment run.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to fetch {kind} for company {company_id}: {source}")]
    Fetch {
        company_id: String,
        kind: MediaKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl EnrichError {
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }
}
