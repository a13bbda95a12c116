//! Digit span dataset - one row per (participant, condition)

use crate::domain::types::ParticipantId;
use serde::Serialize;

/// Column names of the output table, in order
pub const COLUMNS: [&str; 3] = ["participant", "condition", "digit_span"];

/// One resolved row of the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitSpanRecord {
    pub participant: ParticipantId,
    pub condition: String,
    pub digit_span: u32,
}

impl DigitSpanRecord {
    pub fn new(participant: ParticipantId, condition: impl Into<String>, digit_span: u32) -> Self {
        Self { participant, condition: condition.into(), digit_span }
    }
}

/// Records sorted by participant, then by condition name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitSpanDataset {
    records: Vec<DigitSpanRecord>,
}

impl DigitSpanDataset {
    /// Sort records into dataset order
    pub fn from_records(mut records: Vec<DigitSpanRecord>) -> Self {
        records.sort_by(|a, b| {
            a.participant.cmp(&b.participant).then_with(|| a.condition.cmp(&b.condition))
        });
        Self { records }
    }

    pub fn records(&self) -> &[DigitSpanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows belonging to one participant
    pub fn for_participant(
        &self,
        participant: ParticipantId,
    ) -> impl Iterator<Item = &DigitSpanRecord> + '_ {
        self.records.iter().filter(move |r| r.participant == participant)
    }

    /// Look up the span for a (participant, condition) pair
    pub fn digit_span(&self, participant: ParticipantId, condition: &str) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.participant == participant && r.condition == condition)
            .map(|r| r.digit_span)
    }
}
