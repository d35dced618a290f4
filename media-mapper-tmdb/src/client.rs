use std::time::Duration;

use media_mapper_core::{MediaFetcher, MediaItem, MediaKind};

use crate::config::TmdbConfig;
use crate::error::TmdbError;
use crate::types::DiscoverResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("media-mapper/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the TMDB discover endpoints.
pub struct TmdbClient {
    http: reqwest::blocking::Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, TmdbError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    /// All items of `kind` credited to a company, following at most
    /// `max_pages` pages of results.
    pub fn discover(&self, company_id: &str, kind: MediaKind) -> Result<Vec<MediaItem>, TmdbError> {
        let first = self.discover_page(company_id, kind, 1)?;
        let last_page = first
            .total_pages
            .unwrap_or(1)
            .clamp(1, self.config.max_pages.max(1));

        let mut items = first.into_items(kind)?;
        for page in 2..=last_page {
            items.extend(self.discover_page(company_id, kind, page)?.into_items(kind)?);
        }

        log::debug!(
            "Discovered {} {kind} items for company {company_id} ({last_page} page(s))",
            items.len()
        );
        Ok(items)
    }

    /// Like [`discover`](Self::discover), taking the kind in its text form.
    pub fn fetch_named(&self, company_id: &str, kind: &str) -> Result<Vec<MediaItem>, TmdbError> {
        let kind: MediaKind = kind.parse()?;
        self.discover(company_id, kind)
    }

    /// Fetch and parse a single page of discover results.
    pub fn discover_page(
        &self,
        company_id: &str,
        kind: MediaKind,
        page: u32,
    ) -> Result<DiscoverResponse, TmdbError> {
        let url = discover_url(&self.config.base_url, kind);
        let shown_url = format!("{url}?with_companies={company_id}&page={page}");

        let mut params = vec![
            ("api_key", self.config.api_key.clone()),
            ("with_companies", company_id.to_string()),
        ];
        if page > 1 {
            params.push(("page", page.to_string()));
        }

        let resp = self.http.get(&url).query(&params).send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TmdbError::InvalidApiKey);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TmdbError::RateLimit);
        }
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                url: shown_url,
            });
        }

        let text = resp.text()?;
        serde_json::from_str(&text).map_err(|e| {
            TmdbError::api(format!(
                "Failed to parse discover response from {shown_url}: {e}. Response: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}

impl MediaFetcher for TmdbClient {
    type Error = TmdbError;

    fn fetch(&self, company_id: &str, kind: MediaKind) -> Result<Vec<MediaItem>, Self::Error> {
        self.discover(company_id, kind)
    }
}

/// Discover endpoint for a kind, e.g. `{base}/discover/movie`.
pub fn discover_url(base_url: &str, kind: MediaKind) -> String {
    format!("{}/discover/{}", base_url.trim_end_matches('/'), kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_url() {
        assert_eq!(
            discover_url("https://api.themoviedb.org/3", MediaKind::Movie),
            "https://api.themoviedb.org/3/discover/movie"
        );
        assert_eq!(
            discover_url("http://localhost:8080/3/", MediaKind::Tv),
            "http://localhost:8080/3/discover/tv"
        );
    }

    #[test]
    fn test_fetch_named_rejects_unknown_kind() {
        let client = TmdbClient::new(TmdbConfig::new("key")).unwrap();
        let err = client.fetch_named("42", "person").unwrap_err();
        assert!(matches!(err, TmdbError::InvalidArgument(_)));
    }
}
