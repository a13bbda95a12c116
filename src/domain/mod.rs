//! Domain models - trial outcomes, conditions, and the output dataset
//!
//! This module contains the canonical data types used throughout the system:
//! - `TrialOutcome` - one decoded trial line of a raw log
//! - `ParticipantId` - participant identifier parsed from a folder name
//! - `ConditionSet` - ordered condition name to file name mapping
//! - `DigitSpanDataset` - sorted (participant, condition, digit_span) rows

pub mod dataset;
pub mod types;

// Re-export commonly used types at module level
pub use dataset::{DigitSpanDataset, DigitSpanRecord};
pub use types::{Condition, ConditionSet, ParticipantId, TrialOutcome};
