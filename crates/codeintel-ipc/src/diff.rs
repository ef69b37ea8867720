//! Line diffs used to ship file contents to the worker.
//!
//! Each line of a diff is a two character prefix followed by the line, terminator included:
//!
//! ```text
//!   unchanged line
//! - removed line
//! + added line
//! ```
//!
//! A line without a terminator (the last line of a file not ending in a newline) is written
//! with an artificial `\n` followed by [`NO_NEWLINE_MARKER`] on its own line.

use crate::error::DiffError;
use similar::{ChangeTag, TextDiff};

/// Marks that the preceding diff line had no terminator in the original text.
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Line diff turning `old` into `new`.
///
/// Only `\n` ends a line; a lone `\r` stays part of the line it appears in.
pub fn line_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    let diff = TextDiff::configure().diff_slices(old_lines.as_slice(), new_lines.as_slice());
    let mut out = String::with_capacity(new.len() + new.len() / 8);

    for change in diff.iter_all_changes() {
        out.push_str(match change.tag() {
            ChangeTag::Equal => "  ",
            ChangeTag::Delete => "- ",
            ChangeTag::Insert => "+ ",
        });
        let line = change.value();
        out.push_str(line);
        if !line.ends_with('\n') {
            out.push('\n');
            out.push_str(NO_NEWLINE_MARKER);
            out.push('\n');
        }
    }
    out
}

/// Apply a diff produced by [`line_diff`] to `old`.
///
/// Context and removed lines are checked against `old`; `? ` hint lines are skipped.
pub fn apply_line_diff(old: &str, diff: &str) -> Result<String, DiffError> {
    let entries = parse_entries(diff)?;
    let mut old_lines = old.split_inclusive('\n');
    let mut out = String::with_capacity(old.len());

    for (line_no, tag, text) in entries {
        match tag {
            ChangeTag::Insert => out.push_str(&text),
            ChangeTag::Equal | ChangeTag::Delete => {
                if old_lines.next() != Some(text.as_str()) {
                    return Err(DiffError::ContextMismatch(line_no));
                }
                if tag == ChangeTag::Equal {
                    out.push_str(&text);
                }
            }
        }
    }

    if old_lines.next().is_some() {
        return Err(DiffError::UnconsumedText);
    }
    Ok(out)
}

fn parse_entries(diff: &str) -> Result<Vec<(usize, ChangeTag, String)>, DiffError> {
    let mut entries: Vec<(usize, ChangeTag, String)> = Vec::new();

    for (idx, raw) in diff.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        if raw.trim_end_matches(['\r', '\n']) == NO_NEWLINE_MARKER {
            let Some((_, _, text)) = entries.last_mut() else {
                return Err(DiffError::MalformedLine(line_no));
            };
            if text.ends_with('\n') {
                text.pop();
            }
            continue;
        }

        let (prefix, text) = raw.split_at_checked(2).ok_or(DiffError::MalformedLine(line_no))?;
        let tag = match prefix {
            "  " => ChangeTag::Equal,
            "- " => ChangeTag::Delete,
            "+ " => ChangeTag::Insert,
            "? " => continue,
            _ => return Err(DiffError::MalformedLine(line_no)),
        };
        entries.push((line_no, tag, text.to_string()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(old: &str, new: &str) {
        let diff = line_diff(old, new);
        assert_eq!(apply_line_diff(old, &diff).unwrap(), new, "diff was:\n{diff}");
    }

    #[test]
    fn test_diff_format() {
        let diff = line_diff("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(diff, "  a\n- b\n+ x\n  c\n");
    }

    #[test]
    fn test_missing_final_newline_is_marked() {
        let diff = line_diff("", "abc");
        assert_eq!(diff, "+ abc\n\\ No newline at end of file\n");
        assert_eq!(apply_line_diff("", &diff).unwrap(), "abc");
    }

    #[test]
    fn test_round_trips() {
        round_trip("", "");
        round_trip("", "first\nsecond\n");
        round_trip("first\nsecond\n", "");
        round_trip("a", "a\n");
        round_trip("a\n", "a");
        round_trip("one\ntwo\nthree", "zero\none\nthree\nfour");
        round_trip("crlf\r\nline\r\n", "crlf\r\nchanged\r\n");
        round_trip("x\nx\nx\n", "x\nx\n");
        round_trip("a\rb\n", "a\rc\n");
        round_trip("a\r", "b\r");
        round_trip("", "a\rb");
        round_trip("\r\r\n\r", "\r\n\r");
    }

    #[test]
    fn test_lone_carriage_return_stays_in_its_line() {
        let diff = line_diff("", "a\rb\n");
        assert_eq!(diff, "+ a\rb\n");

        let diff = line_diff("a\r", "b\r");
        assert_eq!(
            diff,
            "- a\r\n\\ No newline at end of file\n+ b\r\n\\ No newline at end of file\n"
        );
    }

    #[test]
    fn test_apply_rejects_mismatched_context() {
        assert_eq!(
            apply_line_diff("a\nb\n", "  a\n- c\n"),
            Err(DiffError::ContextMismatch(2))
        );
        assert_eq!(apply_line_diff("a\nb\n", "  a\n"), Err(DiffError::UnconsumedText));
        assert_eq!(apply_line_diff("", "* a\n"), Err(DiffError::MalformedLine(1)));
    }

    #[test]
    fn test_apply_skips_hint_lines() {
        let diff = "- abc\n? ^\n+ xbc\n? ^\n";
        assert_eq!(apply_line_diff("abc\n", diff).unwrap(), "xbc\n");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Text built from short fragments mixing every line terminator.
    fn text() -> impl Strategy<Value = String> {
        let part = prop_oneof![
            "[ab]{0,3}",
            Just("\n".to_string()),
            Just("\r".to_string()),
            Just("\r\n".to_string()),
        ];
        prop::collection::vec(part, 0..12).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn diff_round_trips(old in text(), new in text()) {
            let diff = line_diff(&old, &new);
            prop_assert_eq!(apply_line_diff(&old, &diff), Ok(new));
        }

        #[test]
        fn every_diff_line_has_a_known_prefix(old in text(), new in text()) {
            let diff = line_diff(&old, &new);
            for line in diff.split_inclusive('\n') {
                prop_assert!(line.ends_with('\n'));
                prop_assert!(
                    line.starts_with("  ")
                        || line.starts_with("- ")
                        || line.starts_with("+ ")
                        || line == "\\ No newline at end of file\n",
                    "unexpected diff line {:?}",
                    line
                );
            }
        }
    }
}
