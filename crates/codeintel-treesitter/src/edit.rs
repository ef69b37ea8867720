//! Single-region line diff → tree-sitter `InputEdit`.
//!
//! The edit covers everything between the first and last line that differ between the old and
//! new text. Multiple disjoint changes collapse into one larger region; the reparse is still
//! correct, it just reuses fewer subtrees.

use tree_sitter::{InputEdit, Point};

/// Compute the edit turning `old` into `new`, or `None` if the texts are identical.
///
/// Lines are compared with their terminators, so a change to the final newline (or `\r\n`
/// line endings) is detected like any other.
pub fn line_edit(old: &str, new: &str) -> Option<InputEdit> {
    if old == new {
        return None;
    }

    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    let common = old_lines.len().min(new_lines.len());

    let head = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    // The unchanged tail may not reach back into the unchanged head.
    let tail = old_lines
        .iter()
        .rev()
        .zip(new_lines.iter().rev())
        .take(common - head)
        .take_while(|(a, b)| a == b)
        .count();

    let start_byte: usize = old_lines[..head].iter().map(|l| l.len()).sum();
    let old_tail: usize = old_lines[old_lines.len() - tail..]
        .iter()
        .map(|l| l.len())
        .sum();
    let new_tail: usize = new_lines[new_lines.len() - tail..]
        .iter()
        .map(|l| l.len())
        .sum();
    let old_end_byte = old.len() - old_tail;
    let new_end_byte = new.len() - new_tail;

    Some(InputEdit {
        start_byte,
        old_end_byte,
        new_end_byte,
        start_position: point_at(old, start_byte),
        old_end_position: point_at(old, old_end_byte),
        new_end_position: point_at(new, new_end_byte),
    })
}

/// Whether `edit` describes a valid range of `old` and `new`.
pub fn edit_in_bounds(edit: &InputEdit, old: &str, new: &str) -> bool {
    edit.start_byte <= edit.old_end_byte
        && edit.start_byte <= edit.new_end_byte
        && edit.old_end_byte <= old.len()
        && edit.new_end_byte <= new.len()
}

/// Row/byte-column point of `byte` within `text`.
pub fn point_at(text: &str, byte: usize) -> Point {
    let prefix = &text.as_bytes()[..byte.min(text.len())];
    let row = prefix.iter().filter(|b| **b == b'\n').count();
    let line_start = prefix
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |idx| idx + 1);
    Point {
        row,
        column: prefix.len() - line_start,
    }
}
