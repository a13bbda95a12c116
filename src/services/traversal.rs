//! Participant tree traversal
//!
//! Scans the root for `participant_<id>` folders, then yields one
//! `FileOutcome` per (participant, condition) pair: the resolved span, or a
//! missing marker. Skip policy lives in the dataset builder; this module
//! only enumerates and resolves.
//!
//! Folders are visited in lexical name order and conditions in set order,
//! so the sequence does not depend on directory listing order.

use crate::domain::types::{Condition, ConditionSet, ParticipantId};
use crate::io::trial_log::read_trial_log;
use crate::services::span_resolver::resolve_digit_span;
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory recognised as a participant folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFolder {
    pub id: ParticipantId,
    pub name: String,
    pub path: PathBuf,
}

/// Participant folders found under a root, plus what was passed over
#[derive(Debug, Clone, Default)]
pub struct ParticipantScan {
    pub folders: Vec<ParticipantFolder>,
    /// Entries that are not participant folders
    pub ignored: usize,
    /// Folders whose id was already taken by an earlier folder
    pub duplicates: usize,
}

/// Whether `path` is a directory, following symlinks
///
/// A dangling entry counts as "not a directory"; any other stat failure is an error.
fn is_directory(path: &Path) -> anyhow::Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e)
            .with_context(|| format!("Failed to inspect participant entry {}", path.display())),
    }
}

/// List participant folders under `root`, sorted by folder name
///
/// Fails if the root or any of its entries cannot be read.
pub fn scan_participants(root: &Path) -> anyhow::Result<ParticipantScan> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read data root {}", root.display()))?;

    let mut scan = ParticipantScan::default();
    let mut candidates = Vec::new();

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list data root {}", root.display()))?;
        let path = entry.path();

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!(name = ?raw, "non_utf8_entry_ignored");
                scan.ignored += 1;
                continue;
            }
        };

        let id = match ParticipantId::from_folder_name(&name) {
            Some(id) if is_directory(&path)? => id,
            _ => {
                debug!(name = %name, "non_participant_entry_ignored");
                scan.ignored += 1;
                continue;
            }
        };

        candidates.push(ParticipantFolder { id, name, path });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen = HashSet::with_capacity(candidates.len());
    for folder in candidates {
        if !seen.insert(folder.id) {
            warn!(
                participant = %folder.id,
                folder = %folder.name,
                "duplicate_participant_id_skipped"
            );
            scan.duplicates += 1;
            continue;
        }
        scan.folders.push(folder);
    }

    Ok(scan)
}

/// Result of looking up one condition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    Resolved { digit_span: u32, trials: usize },
    Missing,
}

/// One (participant, condition) step of the traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub participant: ParticipantId,
    pub condition: String,
    pub path: PathBuf,
    pub result: FileResult,
}

/// Look up and resolve a single condition file in a participant folder
pub fn resolve_condition_file(
    folder: &ParticipantFolder,
    condition: &Condition,
) -> anyhow::Result<FileOutcome> {
    let path = folder.path.join(&condition.file);

    let exists = path
        .try_exists()
        .with_context(|| format!("Failed to check for {}", path.display()))?;

    let result = if exists {
        let outcomes = read_trial_log(&path)?;
        FileResult::Resolved { digit_span: resolve_digit_span(&outcomes), trials: outcomes.len() }
    } else {
        FileResult::Missing
    };

    Ok(FileOutcome { participant: folder.id, condition: condition.name.clone(), path, result })
}

/// Iterator over every (participant, condition) pair under a root
pub struct Traversal<'a> {
    conditions: &'a ConditionSet,
    folders: std::vec::IntoIter<ParticipantFolder>,
    current: Option<ParticipantFolder>,
    next_condition: usize,
    participants: usize,
    ignored: usize,
    duplicates: usize,
}

impl<'a> Traversal<'a> {
    /// Scan `root` and prepare to walk it with the given condition set
    pub fn new(root: impl AsRef<Path>, conditions: &'a ConditionSet) -> anyhow::Result<Self> {
        let scan = scan_participants(root.as_ref())?;
        Ok(Self::from_scan(scan, conditions))
    }

    fn from_scan(scan: ParticipantScan, conditions: &'a ConditionSet) -> Self {
        Self {
            conditions,
            participants: scan.folders.len(),
            ignored: scan.ignored,
            duplicates: scan.duplicates,
            folders: scan.folders.into_iter(),
            current: None,
            next_condition: 0,
        }
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl Iterator for Traversal<'_> {
    type Item = anyhow::Result<FileOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(folder) = &self.current {
                if let Some(condition) = self.conditions.get(self.next_condition) {
                    self.next_condition += 1;
                    return Some(resolve_condition_file(folder, condition));
                }
            }

            self.current = Some(self.folders.next()?);
            self.next_condition = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn participant_dir(root: &Path, name: &str) -> PathBuf {
        let path = root.join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        participant_dir(dir.path(), "participant_10");
        participant_dir(dir.path(), "participant_2");
        participant_dir(dir.path(), "pilot_run");
        participant_dir(dir.path(), "participant_abc");
        fs::write(dir.path().join("participant_3"), "not a folder").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let scan = scan_participants(dir.path()).unwrap();
        let names: Vec<&str> = scan.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["participant_10", "participant_2"]);
        assert_eq!(scan.ignored, 4);
        assert_eq!(scan.duplicates, 0);
    }

    #[test]
    fn test_scan_skips_duplicate_ids() {
        let dir = tempdir().unwrap();
        participant_dir(dir.path(), "participant_1");
        participant_dir(dir.path(), "participant_01");

        let scan = scan_participants(dir.path()).unwrap();
        assert_eq!(scan.folders.len(), 1);
        // "participant_01" sorts first and wins
        assert_eq!(scan.folders[0].name, "participant_01");
        assert_eq!(scan.duplicates, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_treats_dangling_symlink_as_non_participant() {
        let dir = tempdir().unwrap();
        participant_dir(dir.path(), "participant_1");
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("participant_2"))
            .unwrap();

        let scan = scan_participants(dir.path()).unwrap();
        assert_eq!(scan.folders.len(), 1);
        assert_eq!(scan.ignored, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_symlink_loop_is_error() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("participant_3");
        std::os::unix::fs::symlink(&link, &link).unwrap();

        let err = scan_participants(dir.path()).unwrap_err();
        assert!(err.to_string().contains("participant_3"));
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let err = scan_participants(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_traversal_yields_every_pair_in_order() {
        let dir = tempdir().unwrap();
        let p1 = participant_dir(dir.path(), "participant_1");
        participant_dir(dir.path(), "participant_2");
        fs::write(p1.join("silence.txt"), "1 3 3 0 //\n1 4 4 1 //\n").unwrap();

        let conditions = ConditionSet::default();
        let traversal = Traversal::new(dir.path(), &conditions).unwrap();
        assert_eq!(traversal.participants(), 2);

        let outcomes: Vec<FileOutcome> = traversal.collect::<anyhow::Result<_>>().unwrap();
        assert_eq!(outcomes.len(), 8);

        let pairs: Vec<(u64, &str)> =
            outcomes.iter().map(|o| (o.participant.0, o.condition.as_str())).collect();
        assert_eq!(
            &pairs[..4],
            &[(1, "silence"), (1, "whitenoise"), (1, "instrumental"), (1, "pop")]
        );

        assert_eq!(outcomes[0].result, FileResult::Resolved { digit_span: 3, trials: 2 });
        assert!(outcomes[1..].iter().all(|o| o.result == FileResult::Missing));
    }

    #[test]
    fn test_traversal_empty_root() {
        let dir = tempdir().unwrap();
        let conditions = ConditionSet::default();
        let mut traversal = Traversal::new(dir.path(), &conditions).unwrap();
        assert!(traversal.next().is_none());
    }

    #[test]
    fn test_unreadable_condition_file_is_error() {
        let dir = tempdir().unwrap();
        let p1 = participant_dir(dir.path(), "participant_1");
        // A directory where a log file is expected cannot be read
        fs::create_dir(p1.join("silence.txt")).unwrap();

        let folder =
            ParticipantFolder { id: ParticipantId(1), name: "participant_1".to_string(), path: p1 };
        let result = resolve_condition_file(&folder, &Condition::new("silence", "silence.txt"));
        assert!(result.is_err());
    }
}
