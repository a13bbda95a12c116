//! Trial log parser - decodes trial outcome lines from raw PsyToolkit logs
//!
//! A trial line looks like `2 4 5 0 // 10 2 4 // ...`: an optional leading
//! integer, then `correct_count total_digits error_flag`, then a `//`
//! marker. Everything after the marker is annotation and ignored. Raw logs
//! interleave these with headers and instrumentation lines, which are
//! skipped without comment.

use crate::domain::types::TrialOutcome;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::trace;

/// Token that ends the numeric part of a trial line
const ANNOTATION_MARKER: &str = "//";

/// Leading integer plus the three scored fields
const MAX_FIELDS: usize = 4;

/// Parse a single line into a trial outcome
///
/// Returns `None` for any line that does not have exactly three or four
/// unsigned integer tokens followed by a token starting with `//`, and for
/// lines whose scored fields overflow `u32`.
pub fn parse_trial_line(line: &str) -> Option<TrialOutcome> {
    let mut fields = [""; MAX_FIELDS];
    let mut count = 0;

    for token in line.split_whitespace() {
        if token.starts_with(ANNOTATION_MARKER) {
            let [correct, total, flag] = match count {
                3 => [fields[0], fields[1], fields[2]],
                4 => [fields[1], fields[2], fields[3]],
                _ => return None,
            };
            let correct_count = correct.parse::<u32>().ok()?;
            let sequence_length = total.parse::<u32>().ok()?;
            let error_flag = flag.parse::<u32>().ok()?;
            return Some(TrialOutcome::new(correct_count, sequence_length, error_flag != 0));
        }

        if count == MAX_FIELDS || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        fields[count] = token;
        count += 1;
    }

    // No marker on this line
    None
}

/// Parse every trial line in a log's contents, in file order
pub fn parse_trial_log(contents: &str) -> Vec<TrialOutcome> {
    contents.lines().filter_map(parse_trial_line).collect()
}

/// Read a raw log from disk and parse its trial lines
///
/// The file is read fully and closed before parsing. Invalid UTF-8 is
/// replaced, so such lines simply fail to match.
pub fn read_trial_log(path: impl AsRef<Path>) -> anyhow::Result<Vec<TrialOutcome>> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read trial log {}", path.display()))?;

    let outcomes = parse_trial_log(&String::from_utf8_lossy(&bytes));
    trace!(
        path = %path.display(),
        bytes = %bytes.len(),
        trials = %outcomes.len(),
        "trial_log_parsed"
    );

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_four_field_line() {
        let outcome = parse_trial_line("2 4 5 0 // 10 2 4 // 1 2 3 4 5").unwrap();
        assert_eq!(outcome, TrialOutcome::new(4, 5, false));
    }

    #[test]
    fn test_parse_three_field_line() {
        assert_eq!(parse_trial_line("3 4 0 // ..."), Some(TrialOutcome::new(3, 4, false)));
        assert_eq!(parse_trial_line("2 5 1 // ..."), Some(TrialOutcome::new(2, 5, true)));
    }

    #[test]
    fn test_nonzero_flag_is_error() {
        let outcome = parse_trial_line("1 3 7 2 //").unwrap();
        assert!(outcome.error);
        assert_eq!(outcome.sequence_length, 7);
    }

    #[test]
    fn test_leading_whitespace_and_tabs() {
        assert_eq!(parse_trial_line("   \t9 4 6 0\t// x"), Some(TrialOutcome::new(4, 6, false)));
    }

    #[test]
    fn test_marker_may_be_followed_directly_by_text() {
        assert_eq!(parse_trial_line("1 4 6 0 //annotation"), Some(TrialOutcome::new(4, 6, false)));
    }

    #[test]
    fn test_marker_glued_to_number_does_not_match() {
        assert_eq!(parse_trial_line("1 4 6 0// x"), None);
    }

    #[test]
    fn test_wrong_field_count_does_not_match() {
        assert_eq!(parse_trial_line("4 6 // x"), None);
        assert_eq!(parse_trial_line("1 2 3 4 5 // x"), None);
        assert_eq!(parse_trial_line("// only a comment"), None);
    }

    #[test]
    fn test_non_numeric_tokens_do_not_match() {
        assert_eq!(parse_trial_line("a 4 6 0 // x"), None);
        assert_eq!(parse_trial_line("1 -4 6 0 // x"), None);
        assert_eq!(parse_trial_line("1 +4 6 0 // x"), None);
        assert_eq!(parse_trial_line("1 4.0 6 0 // x"), None);
    }

    #[test]
    fn test_lines_without_marker_do_not_match() {
        assert_eq!(parse_trial_line(""), None);
        assert_eq!(parse_trial_line("   "), None);
        assert_eq!(parse_trial_line("1 4 6 0"), None);
        assert_eq!(parse_trial_line("digitspan experiment v2"), None);
    }

    #[test]
    fn test_overflowing_field_skips_line() {
        assert_eq!(parse_trial_line("1 4 99999999999 0 // x"), None);
    }

    #[test]
    fn test_oversized_leading_token_is_not_parsed() {
        assert_eq!(
            parse_trial_line("99999999999999999999 4 6 0 // x"),
            Some(TrialOutcome::new(4, 6, false))
        );
    }

    #[test]
    fn test_parse_trial_log_skips_noise() {
        let contents = "\
# header line
blank follows

3 4 0 // first
instrumentation: 12 34
2 5 1 // second
4 6 0 // third
";
        let outcomes = parse_trial_log(contents);
        assert_eq!(
            outcomes,
            vec![
                TrialOutcome::new(3, 4, false),
                TrialOutcome::new(2, 5, true),
                TrialOutcome::new(4, 6, false),
            ]
        );
    }

    #[test]
    fn test_parse_trial_log_crlf() {
        let outcomes = parse_trial_log("1 3 3 0 // a\r\n1 3 4 1 // b\r\n");
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_read_trial_log_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silence.txt");
        let mut bytes = b"1 3 3 0 // ok\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b' ', b'1', b'\n']);
        bytes.extend_from_slice(b"1 4 4 0 // ok\n");
        fs::write(&path, bytes).unwrap();

        let outcomes = read_trial_log(&path).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_read_trial_log_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = read_trial_log(dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
