//! Dataset builder - turns a participant tree into the digit span dataset
//!
//! Missing condition files are reported and skipped; they never become rows.
//! Any other filesystem failure aborts the build.

use crate::domain::dataset::{DigitSpanDataset, DigitSpanRecord};
use crate::domain::types::ConditionSet;
use crate::infra::summary::RunSummary;
use crate::services::traversal::{FileResult, Traversal};
use std::path::Path;
use tracing::{debug, info, warn};

/// Output of one build: the sorted dataset and the run counters
#[derive(Debug, Clone)]
pub struct Extraction {
    pub dataset: DigitSpanDataset,
    pub summary: RunSummary,
}

/// Builds datasets for a fixed condition set
pub struct DatasetBuilder {
    conditions: ConditionSet,
}

impl DatasetBuilder {
    pub fn new(conditions: ConditionSet) -> Self {
        Self { conditions }
    }

    /// Walk `root` and resolve every participant/condition file
    pub fn build(&self, root: impl AsRef<Path>) -> anyhow::Result<Extraction> {
        let root = root.as_ref();
        info!(root = %root.display(), conditions = ?self.conditions.names(), "extraction_starting");

        let traversal = Traversal::new(root, &self.conditions)?;
        let mut summary = RunSummary {
            participants: traversal.participants(),
            entries_ignored: traversal.ignored(),
            duplicate_participants: traversal.duplicates(),
            ..Default::default()
        };

        let mut records = Vec::with_capacity(summary.participants * self.conditions.len());

        for outcome in traversal {
            let outcome = outcome?;
            match outcome.result {
                FileResult::Missing => {
                    warn!(
                        participant = %outcome.participant,
                        condition = %outcome.condition,
                        "missing file {}, skipping",
                        outcome.path.display()
                    );
                    summary.files_missing += 1;
                }
                FileResult::Resolved { digit_span, trials } => {
                    debug!(
                        participant = %outcome.participant,
                        condition = %outcome.condition,
                        trials = %trials,
                        digit_span = %digit_span,
                        "digit_span_resolved"
                    );
                    summary.files_resolved += 1;
                    records.push(DigitSpanRecord::new(
                        outcome.participant,
                        outcome.condition,
                        digit_span,
                    ));
                }
            }
        }

        Ok(Extraction { dataset: DigitSpanDataset::from_records(records), summary })
    }
}
