//! Terminal progress display for an enrichment run.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use media_mapper_core::SourceRow;
use media_mapper_enrich::{EnrichProgress, EnrichSummary, SkipReason};

/// Progress reporter backed by a single `indicatif` bar.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    /// When `quiet` is true the bar is never drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::with_template("  [{bar:15.green}] {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            pb
        };
        Self { pb }
    }
}

impl EnrichProgress for BarProgress {
    fn on_start(&self, total_rows: usize) {
        self.pb.set_length(total_rows as u64);
        self.pb.set_position(0);
    }

    fn on_skip(&self, row: &SourceRow, reason: SkipReason) {
        if reason == SkipReason::AlreadyRetrieved {
            self.pb.set_message(format!(
                "Skipping already retrieved [{}]: {}",
                row.company_id, row.company_name
            ));
        }
        log::trace!("Skipped [{}]: {reason}", row.company_id);
    }

    fn on_retrieve(&self, row: &SourceRow) {
        self.pb
            .set_message(format!("Retrieving [{}]: {}", row.company_id, row.company_name));
    }

    fn on_row_done(&self, current: usize, _total: usize) {
        self.pb.set_position(current as u64);
    }

    fn on_checkpoint(&self, path: &Path, companies: usize) {
        self.pb.suspend(|| {
            log::debug!("Saved progress ({companies} companies) to {}", path.display());
        });
    }

    fn on_complete(&self, _summary: &EnrichSummary) {
        self.pb.finish_and_clear();
    }
}
