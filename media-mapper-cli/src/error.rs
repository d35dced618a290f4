use thiserror::Error;

use media_mapper_enrich::EnrichError;
use media_mapper_tmdb::TmdbError;

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// TMDB client setup or configuration failed
    #[error("{0}")]
    Tmdb(#[from] TmdbError),

    /// The enrichment run stopped
    #[error("{0}")]
    Enrich(#[from] EnrichError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
