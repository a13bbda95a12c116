//! Span resolver - reduces a file's trial outcomes to one digit span
//!
//! The span is the longest sequence reproduced without error. Failed
//! trials never count, however long. No error-free trial means a span of 0.

use crate::domain::types::TrialOutcome;

/// Longest error-free sequence length, or 0 when there is none
pub fn resolve_digit_span<'a, I>(outcomes: I) -> u32
where
    I: IntoIterator<Item = &'a TrialOutcome>,
{
    outcomes
        .into_iter()
        .filter(|outcome| outcome.is_error_free())
        .map(|outcome| outcome.sequence_length)
        .max()
        .unwrap_or(0)
}
