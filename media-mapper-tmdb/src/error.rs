/// Errors that can occur while talking to the TMDB API.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("TMDB rejected the API key")]
    InvalidApiKey,

    #[error("Rate limited by TMDB API")]
    RateLimit,

    #[error("Server error (HTTP {status}) for {url}")]
    Status { status: u16, url: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TmdbError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Request URLs carry the API key as a query parameter.
impl From<reqwest::Error> for TmdbError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

impl From<media_mapper_core::CatalogError> for TmdbError {
    fn from(e: media_mapper_core::CatalogError) -> Self {
        match e {
            media_mapper_core::CatalogError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::Api(other.to_string()),
        }
    }
}
