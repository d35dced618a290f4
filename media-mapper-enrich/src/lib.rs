//! Orchestration of an enrichment run: comparison rows in, mapping file out.

pub mod enrich;
pub mod error;
pub mod progress;

pub use enrich::{
    DEFAULT_CHECKPOINT_EVERY, DEFAULT_MIN_SCORE, EnrichOptions, EnrichSummary, Enricher,
    RowOutcome, SkipReason, run,
};
pub use error::EnrichError;
pub use progress::{EnrichProgress, LogProgress, SilentProgress};
