//! Enrichment progress reporting.

use std::path::Path;

use media_mapper_core::SourceRow;

use crate::enrich::{EnrichSummary, SkipReason};

/// Trait for receiving enrichment progress updates.
pub trait EnrichProgress {
    /// Called once before the first row, with the number of data rows.
    fn on_start(&self, total_rows: usize);

    /// Called when a row is skipped without fetching.
    fn on_skip(&self, row: &SourceRow, reason: SkipReason);

    /// Called right before a company's media is fetched.
    fn on_retrieve(&self, row: &SourceRow);

    /// Called after each row, skipped or not.
    fn on_row_done(&self, current: usize, total: usize);

    /// Called after the mapping file has been written.
    fn on_checkpoint(&self, path: &Path, companies: usize);

    /// Called when the run is complete.
    fn on_complete(&self, summary: &EnrichSummary);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl EnrichProgress for SilentProgress {
    fn on_start(&self, _total_rows: usize) {}
    fn on_skip(&self, _row: &SourceRow, _reason: SkipReason) {}
    fn on_retrieve(&self, _row: &SourceRow) {}
    fn on_row_done(&self, _current: usize, _total: usize) {}
    fn on_checkpoint(&self, _path: &Path, _companies: usize) {}
    fn on_complete(&self, _summary: &EnrichSummary) {}
}

/// A progress reporter that logs to the `log` crate, for output that is not
/// a terminal.
pub struct LogProgress;

impl EnrichProgress for LogProgress {
    fn on_start(&self, total_rows: usize) {
        log::info!("Processing {total_rows} comparison rows");
    }

    fn on_skip(&self, row: &SourceRow, reason: SkipReason) {
        log::debug!("Skipping [{}] {}: {reason}", row.company_id, row.company_name);
    }

    fn on_retrieve(&self, row: &SourceRow) {
        log::debug!("Retrieving [{}]: {}", row.company_id, row.company_name);
    }

    fn on_row_done(&self, current: usize, total: usize) {
        if current.is_multiple_of(500) || current == total {
            log::info!("  [{current}/{total}]");
        }
    }

    fn on_checkpoint(&self, path: &Path, companies: usize) {
        log::info!("Saved {companies} companies to {}", path.display());
    }

    fn on_complete(&self, summary: &EnrichSummary) {
        log::debug!("Run complete: {summary}");
    }
}
