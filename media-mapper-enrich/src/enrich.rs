//! Resumable enrichment of comparison rows with catalog media.
//!
//! A run walks the comparison file once. Companies below the score threshold
//! are ignored, companies that already have a recorded name are treated as
//! done, and everything else is fetched and merged into the mapping. The
//! mapping file is rewritten every `checkpoint_every` fetched companies and
//! once at the end, so an aborted run resumes from its last checkpoint.

use std::path::Path;

use media_mapper_core::{
    Cache, CompanyNames, MediaFetcher, MediaKind, SourceReader, SourceRow, count_rows, store,
};

use crate::error::EnrichError;
use crate::progress::EnrichProgress;

/// Rows scoring below this are not enriched.
pub const DEFAULT_MIN_SCORE: f64 = 0.75;

/// Fetched companies between mapping file saves.
pub const DEFAULT_CHECKPOINT_EVERY: usize = 100;

/// Tunable policy for a run.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub min_score: f64,
    pub checkpoint_every: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
        }
    }
}

impl EnrichOptions {
    pub fn validate(&self) -> Result<(), EnrichError> {
        if self.checkpoint_every == 0 {
            return Err(EnrichError::invalid_options(
                "checkpoint_every must be at least 1",
            ));
        }
        if !self.min_score.is_finite() {
            return Err(EnrichError::invalid_options("min_score must be a number"));
        }
        Ok(())
    }
}

/// Why a comparison row was not fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rows without a company id are never fetched.
    BlankId,
    LowScore,
    AlreadyRetrieved,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "no company id"),
            Self::LowScore => write!(f, "match score too low"),
            Self::AlreadyRetrieved => write!(f, "already retrieved"),
        }
    }
}

/// What happened to a single comparison row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped(SkipReason),
    Retrieved { items: usize },
}

/// Counts collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub rows: usize,
    pub blank_id: usize,
    pub low_score: usize,
    pub already_retrieved: usize,
    pub retrieved: usize,
    pub items: usize,
    pub checkpoints: usize,
}

impl EnrichSummary {
    fn record(&mut self, outcome: RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Skipped(SkipReason::BlankId) => self.blank_id += 1,
            RowOutcome::Skipped(SkipReason::LowScore) => self.low_score += 1,
            RowOutcome::Skipped(SkipReason::AlreadyRetrieved) => self.already_retrieved += 1,
            RowOutcome::Retrieved { items } => {
                self.retrieved += 1;
                self.items += items;
            }
        }
    }
}

impl std::fmt::Display for EnrichSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows: {} companies retrieved ({} items), {} already retrieved, {} below score, {} without id",
            self.rows, self.retrieved, self.items, self.already_retrieved, self.low_score, self.blank_id
        )
    }
}

/// Drives a run: reads rows, fetches media, and checkpoints the mapping.
pub struct Enricher<'a, F, P: ?Sized> {
    fetcher: F,
    options: EnrichOptions,
    progress: &'a P,
}

impl<'a, F: MediaFetcher, P: EnrichProgress + ?Sized> Enricher<'a, F, P> {
    pub fn new(fetcher: F, options: EnrichOptions, progress: &'a P) -> Result<Self, EnrichError> {
        options.validate()?;
        Ok(Self {
            fetcher,
            options,
            progress,
        })
    }

    /// Enrich every row of `source_path`, persisting to `mapping_path`.
    ///
    /// A comparison file with no data rows returns immediately and leaves the
    /// mapping file untouched.
    pub fn run(&self, source_path: &Path, mapping_path: &Path) -> Result<EnrichSummary, EnrichError> {
        let total = count_rows(source_path)?;
        if total == 0 {
            log::info!("Nothing to do: {} has no data rows", source_path.display());
            return Ok(EnrichSummary::default());
        }

        let (mut cache, mut names) = store::load(mapping_path);
        let reader = SourceReader::open(source_path)?;

        self.progress.on_start(total);
        let mut summary = EnrichSummary::default();
        let mut unsaved = 0usize;

        for (index, row) in reader.enumerate() {
            let row = row?;
            let outcome = self.process_row(&row, &mut cache, &mut names)?;
            summary.record(outcome);
            if matches!(outcome, RowOutcome::Retrieved { .. }) {
                unsaved += 1;
            }
            self.progress.on_row_done(index + 1, total);

            if unsaved >= self.options.checkpoint_every {
                self.checkpoint(&cache, &names, mapping_path)?;
                summary.checkpoints += 1;
                unsaved = 0;
            }
        }

        if unsaved > 0 {
            self.checkpoint(&cache, &names, mapping_path)?;
            summary.checkpoints += 1;
        }

        self.progress.on_complete(&summary);
        Ok(summary)
    }

    /// Apply the skip rules to one row and, if it passes, fetch and merge
    /// every media kind for its company.
    pub fn process_row(
        &self,
        row: &SourceRow,
        cache: &mut Cache,
        names: &mut CompanyNames,
    ) -> Result<RowOutcome, EnrichError> {
        let reason = if row.company_id.is_empty() {
            Some(SkipReason::BlankId)
        } else if !(row.score >= self.options.min_score) {
            // NaN scores count as low
            Some(SkipReason::LowScore)
        } else if names.contains(&row.company_id) {
            Some(SkipReason::AlreadyRetrieved)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.progress.on_skip(row, reason);
            return Ok(RowOutcome::Skipped(reason));
        }

        self.progress.on_retrieve(row);
        names.record(&row.company_id, &row.company_name);
        let media = cache.insert_company(&row.company_id);

        let mut items = 0usize;
        for kind in MediaKind::ALL {
            let fetched = self
                .fetcher
                .fetch(&row.company_id, kind)
                .map_err(|e| EnrichError::Fetch {
                    company_id: row.company_id.clone(),
                    kind,
                    source: Box::new(e),
                })?;
            items += fetched.len();
            for item in fetched {
                media.upsert(item);
            }
        }

        Ok(RowOutcome::Retrieved { items })
    }

    fn checkpoint(
        &self,
        cache: &Cache,
        names: &CompanyNames,
        mapping_path: &Path,
    ) -> Result<(), EnrichError> {
        store::save(cache, names, mapping_path)?;
        self.progress.on_checkpoint(mapping_path, cache.len());
        Ok(())
    }
}

/// Run an enrichment with the given fetcher and options.
pub fn run<F: MediaFetcher, P: EnrichProgress + ?Sized>(
    source_path: &Path,
    mapping_path: &Path,
    fetcher: F,
    options: EnrichOptions,
    progress: &P,
) -> Result<EnrichSummary, EnrichError> {
    Enricher::new(fetcher, options, progress)?.run(source_path, mapping_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EnrichOptions::default();
        assert_eq!(options.min_score, 0.75);
        assert_eq!(options.checkpoint_every, 100);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_checkpoint_rejected() {
        let options = EnrichOptions {
            checkpoint_every: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(EnrichError::InvalidOptions(_))));
    }

    #[test]
    fn test_nan_min_score_rejected() {
        let options = EnrichOptions {
            min_score: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = EnrichSummary::default();
        summary.record(RowOutcome::Skipped(SkipReason::LowScore));
        summary.record(RowOutcome::Skipped(SkipReason::AlreadyRetrieved));
        summary.record(RowOutcome::Retrieved { items: 4 });
        summary.record(RowOutcome::Retrieved { items: 0 });

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.low_score, 1);
        assert_eq!(summary.already_retrieved, 1);
        assert_eq!(summary.retrieved, 2);
        assert_eq!(summary.items, 4);
    }
}
