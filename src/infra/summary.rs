//! Run summary - counters collected during one extraction
//!
//! Logged once at the end of a run, in the same structured form as the
//! rest of the diagnostics.

use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Participant folders scanned
    pub participants: usize,
    /// Condition files found and resolved
    pub files_resolved: usize,
    /// Condition files expected but absent
    pub files_missing: usize,
    /// Root entries that were not participant folders
    pub entries_ignored: usize,
    /// Participant folders skipped because their id was already seen
    pub duplicate_participants: usize,
}

impl RunSummary {
    /// Files the condition set asked for across all participants
    pub fn files_expected(&self) -> usize {
        self.files_resolved + self.files_missing
    }

    pub fn log(&self) {
        info!(
            participants = %self.participants,
            files_expected = %self.files_expected(),
            files_resolved = %self.files_resolved,
            files_missing = %self.files_missing,
            entries_ignored = %self.entries_ignored,
            duplicate_participants = %self.duplicate_participants,
            "extraction_summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_expected() {
        let summary = RunSummary { files_resolved: 6, files_missing: 2, ..Default::default() };
        assert_eq!(summary.files_expected(), 8);
    }

    #[test]
    fn test_default_is_zero() {
        let summary = RunSummary::default();
        assert_eq!(summary.files_expected(), 0);
        assert_eq!(summary.participants, 0);
    }
}
