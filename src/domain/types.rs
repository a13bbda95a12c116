//! Shared types for digit span extraction

use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// Newtype wrapper for participant IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ParticipantId(pub u64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ParticipantId {
    /// Folder name prefix marking a participant directory
    pub const FOLDER_PREFIX: &'static str = "participant_";

    /// Parse a participant folder name of the form `participant_<digits>`
    ///
    /// Returns `None` for anything else, including suffixes that are empty,
    /// carry a sign, or overflow.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        let suffix = name.strip_prefix(Self::FOLDER_PREFIX)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        suffix.parse().ok().map(Self)
    }
}

/// One decoded trial line from a raw log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Digits reproduced correctly (kept for debugging, not scored)
    pub correct_count: u32,
    /// Number of digits presented
    pub sequence_length: u32,
    /// True when the trial was failed
    pub error: bool,
}

impl TrialOutcome {
    pub fn new(correct_count: u32, sequence_length: u32, error: bool) -> Self {
        Self { correct_count, sequence_length, error }
    }

    #[inline]
    pub fn is_error_free(&self) -> bool {
        !self.error
    }
}

/// A named experimental condition and the file that holds its log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Condition {
    pub name: String,
    pub file: String,
}

impl Condition {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self { name: name.into(), file: file.into() }
    }
}

/// Ordered, closed set of conditions looked up in every participant folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self {
            conditions: vec![
                Condition::new("silence", "silence.txt"),
                Condition::new("whitenoise", "whitenoise.txt"),
                Condition::new("instrumental", "instrumental.txt"),
                Condition::new("pop", "pop.txt"),
            ],
        }
    }
}

impl ConditionSet {
    /// Build a condition set, rejecting empty or duplicate entries
    pub fn new(conditions: Vec<Condition>) -> anyhow::Result<Self> {
        ensure!(!conditions.is_empty(), "condition set must contain at least one condition");

        let mut seen = HashSet::with_capacity(conditions.len());
        for condition in &conditions {
            ensure!(!condition.name.trim().is_empty(), "condition name must not be empty");
            ensure!(
                !condition.file.trim().is_empty(),
                "condition '{}' has an empty file name",
                condition.name
            );
            ensure!(
                is_plain_file_name(&condition.file),
                "condition '{}' file '{}' must be a plain file name inside the participant folder",
                condition.name,
                condition.file
            );
            if !seen.insert(condition.name.as_str()) {
                bail!("duplicate condition name '{}'", condition.name);
            }
        }

        Ok(Self { conditions })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Condition names in iteration order
    pub fn names(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.name.as_str()).collect()
    }
}

/// True when `file` is a single normal path component (no separators, `..` or root)
fn is_plain_file_name(file: &str) -> bool {
    let mut components = Path::new(file).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
