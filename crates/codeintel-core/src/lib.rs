#![warn(missing_docs)]
//! `codeintel-core` - the token model shared by every codeintel crate.
//!
//! - [`Token`] / [`Category`]: a position-tagged span with a generic highlight category
//! - [`merge_tokens`] / [`tokens_in_range`]: span merging and viewport filtering
//! - [`special_tokens`]: links and invisible characters, independent of any grammar
//! - [`ReferenceHighlighter`]: the seam for grammar-less (fallback) highlighters

pub mod highlighter;
pub mod merge;
pub mod special;
pub mod token;

pub use highlighter::ReferenceHighlighter;
pub use merge::{TextRange, merge_tokens, tokens_in_range};
pub use special::{HIDDEN_CHARS, is_hidden_char, special_tokens};
pub use token::{Category, Token, TokenPosition, UnknownCategory};
