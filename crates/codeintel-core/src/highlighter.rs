//! The reference highlighter seam.
//!
//! Tree-sitter highlighting falls back to a reference highlighter for languages without a
//! node-type mapping, and the mapping bootstrapper correlates parse trees against its output.

use crate::merge::TextRange;
use crate::token::Token;

/// A highlighter that produces tokens without a parse tree.
pub trait ReferenceHighlighter {
    /// Highlight the lines of `text` covered by `range`, interpreting it as `language`.
    fn highlight(&self, text: &str, language: &str, range: TextRange) -> Vec<Token>;
}

impl<F> ReferenceHighlighter for F
where
    F: Fn(&str, &str, TextRange) -> Vec<Token>,
{
    fn highlight(&self, text: &str, language: &str, range: TextRange) -> Vec<Token> {
        self(text, language, range)
    }
}
