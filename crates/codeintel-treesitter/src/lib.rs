#![warn(missing_docs)]
//! `codeintel-treesitter` - Tree-sitter integration for codeintel.
//!
//! This crate keeps one parse tree per key (a language, optionally narrowed to a file) and
//! brings it up to date incrementally as the text changes:
//!
//! - [`ParseCache`] / [`ParseEntry`]: cached parser, tree and source text
//! - [`line_edit`]: the single changed line region as a tree-sitter edit
//! - [`node_to_tokens`]: leaf traversal that emits tokens through a [`NodeMapping`]
//! - [`make_unrefined_mapping`]: bootstrap a mapping from a reference highlighter
//! - [`TreeSitterHighlighter`]: ties the above together, with a reference-highlighter fallback

mod bootstrap;
mod cache;
mod edit;
mod error;
mod highlight;
mod mapping;
mod walker;

pub use bootstrap::{bootstrap_mapping, make_unrefined_mapping, reference_category};
pub use cache::{ParseCache, ParseEntry, ParseKey, UpdateMode};
pub use edit::{edit_in_bounds, line_edit, point_at};
pub use error::{HighlightError, MappingError};
pub use highlight::{HighlightRequest, TreeSitterHighlighter};
pub use mapping::NodeMapping;
pub use walker::{for_each_leaf, leaf_tokens, node_to_tokens};
