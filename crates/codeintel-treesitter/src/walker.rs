//! Depth-first leaf traversal and leaf → token conversion.

use crate::mapping::NodeMapping;
use codeintel_core::{Category, Token, merge_tokens};
use tree_sitter::{Node, Point};

/// Visit every leaf (childless node) under `root` in document order.
///
/// The cursor descends to the first child when there is one, otherwise moves to the next
/// sibling, climbing until an ancestor has one. Each node is reached exactly once.
pub fn for_each_leaf<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.child_count() == 0 {
            visit(node);
        }

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Convert the mapped leaves under `root` into merged tokens.
///
/// `source` must be the text `root` was parsed from. Leaves whose node type is missing from
/// `mapping` produce no token.
pub fn node_to_tokens(root: Node<'_>, source: &str, mapping: &NodeMapping) -> Vec<Token> {
    let mut tokens = Vec::new();

    for_each_leaf(root, |node| {
        let Some(category) = mapping.get(node.kind()) else {
            tracing::debug!(
                node_type = node.kind(),
                start = ?node.start_position(),
                end = ?node.end_position(),
                "node type not mapped"
            );
            return;
        };

        let text = source.as_bytes().get(node.byte_range()).unwrap_or_default();
        tokens.extend(leaf_tokens(
            node.start_position(),
            node.end_position(),
            text,
            category,
        ));
    });

    merge_tokens(tokens)
}

/// Tokens for a single leaf spanning `start..end` whose source bytes are `text`.
///
/// A single-line leaf becomes one token, zero-width leaves included. A multi-line leaf becomes
/// one token per non-blank line: the first keeps the leaf's start column, later lines start
/// after their indentation and exclude trailing whitespace.
pub fn leaf_tokens(start: Point, end: Point, text: &[u8], category: Category) -> Vec<Token> {
    if start.row == end.row {
        let length = end.column.saturating_sub(start.column);
        return vec![Token::new(start.row + 1, start.column, length, category)];
    }

    let mut tokens = Vec::new();
    for (idx, line) in text.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        let row = start.row + 1 + idx;
        if idx == 0 {
            tokens.push(Token::new(row, start.column, line.len(), category));
            continue;
        }

        let indent = line.len() - line.trim_ascii_start().len();
        tokens.push(Token::new(row, indent, trimmed.len(), category));
    }
    tokens
}
