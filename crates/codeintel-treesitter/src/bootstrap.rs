//! Bootstrap a node-type mapping from a reference highlighter.
//!
//! Authoring a mapping for a new grammar by hand is tedious. Instead, parse a representative
//! file, run a reference highlighter over the same text and, for each leaf node type, adopt the
//! category of the reference token that covers the leaf. The result is a starting point meant to
//! be refined by hand: node types that could not be matched are left out, never guessed.

use crate::error::HighlightError;
use crate::mapping::NodeMapping;
use crate::walker::for_each_leaf;
use codeintel_core::{Category, ReferenceHighlighter, TextRange, Token};
use std::collections::HashSet;
use tree_sitter::{Language, Node, Parser};

/// Find the reference category for `sample`.
///
/// An exact match (same line, column and length) wins; otherwise the first reference token on
/// the same line whose span fully contains the sample. Partial overlaps never match.
pub fn reference_category(sample: &Token, reference: &[Token]) -> Option<Category> {
    let same_line = || reference.iter().filter(|t| t.line() == sample.line());

    same_line()
        .find(|t| t.column() == sample.column() && t.length() == sample.length())
        .or_else(|| same_line().find(|t| sample.is_within(t)))
        .map(Token::category)
}

/// Build a mapping for the leaves under `root` from `reference` tokens of the same `source`.
///
/// Every node type is sampled once, at its first occurrence. Types listed in `exclude` are
/// skipped.
pub fn make_unrefined_mapping(
    root: Node<'_>,
    source: &str,
    reference: &[Token],
    exclude: &[&str],
) -> NodeMapping {
    let mut mapping = NodeMapping::new();
    let mut seen: HashSet<&'static str> = HashSet::new();

    for_each_leaf(root, |node| {
        let kind = node.kind();
        if exclude.contains(&kind) || !seen.insert(kind) {
            return;
        }

        let sample = sample_token(node, source);
        match reference_category(&sample, reference) {
            Some(category) => {
                mapping.insert(kind, category);
            }
            None => {
                tracing::warn!(
                    node_type = kind,
                    line = sample.line(),
                    column = sample.column(),
                    length = sample.length(),
                    "cannot map node type"
                );
            }
        }
    });

    mapping
}

/// Parse `source` with `language`, highlight it with `highlighter` and bootstrap a mapping.
pub fn bootstrap_mapping(
    language: &Language,
    language_id: &str,
    source: &str,
    highlighter: &impl ReferenceHighlighter,
    exclude: &[&str],
) -> Result<NodeMapping, HighlightError> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| HighlightError::Language(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or(HighlightError::ParseFailed)?;

    let reference = highlighter.highlight(source, language_id, TextRange::all());
    Ok(make_unrefined_mapping(
        tree.root_node(),
        source,
        &reference,
        exclude,
    ))
}

// A multi-line leaf is sampled by its first line only.
fn sample_token(node: Node<'_>, source: &str) -> Token {
    let start = node.start_position();
    let end = node.end_position();
    let length = if start.row == end.row {
        end.column.saturating_sub(start.column)
    } else {
        let rest = source.as_bytes().get(node.start_byte()..).unwrap_or_default();
        rest.iter().position(|b| *b == b'\n').unwrap_or(rest.len())
    };
    Token::new(start.row + 1, start.column, length, Category::Text)
}
