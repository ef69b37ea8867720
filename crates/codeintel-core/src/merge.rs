//! Token merging and viewport filtering.

use crate::token::Token;

/// Inclusive, 1-indexed line range.
///
/// `end == None` means "through the last line of the text".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    /// First line (1-based, inclusive).
    pub start: usize,
    /// Last line (1-based, inclusive), or `None` for the end of the text.
    pub end: Option<usize>,
}

impl Default for TextRange {
    fn default() -> Self {
        Self::all()
    }
}

impl TextRange {
    /// Range covering `start..=end`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Range covering the whole text.
    pub const fn all() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }

    /// Range from `start` to the end of the text.
    pub const fn from_line(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Resolve against a text with `line_count` lines, returning concrete `(start, end)` lines.
    ///
    /// A start of `0` is treated as `1`; an open end becomes `line_count`.
    pub fn resolve(&self, line_count: usize) -> (usize, usize) {
        let start = self.start.max(1);
        let end = self.end.unwrap_or(line_count);
        (start, end)
    }

    /// Resolve against `text`, counting lines the way `str::lines` does.
    pub fn resolve_for_text(&self, text: &str) -> (usize, usize) {
        self.resolve(text.lines().count())
    }

    /// Whether `line` lies inside the range (open end accepts any line after `start`).
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start.max(1) && self.end.is_none_or(|end| line <= end)
    }
}

/// Merge same-category tokens that touch or overlap on the same line.
///
/// The result is ordered by position. Tokens of different categories never merge, even when
/// their spans overlap.
pub fn merge_tokens(tokens: impl IntoIterator<Item = Token>) -> Vec<Token> {
    let mut tokens: Vec<Token> = tokens.into_iter().collect();
    tokens.sort_by_key(|t| t.position());

    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(last) = merged.last_mut()
            && last.is_mergeable_with(&token)
        {
            let column = last.column().min(token.column());
            let end = last.end_column().max(token.end_column());
            *last = Token::new(last.line(), column, end - column, last.category());
            continue;
        }
        merged.push(token);
    }

    merged
}

/// Keep only tokens whose line falls in `range`.
pub fn tokens_in_range(tokens: impl IntoIterator<Item = Token>, range: TextRange) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| range.contains_line(t.line()))
        .collect()
}
