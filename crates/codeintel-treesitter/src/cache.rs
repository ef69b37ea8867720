//! Parse-tree cache: one parser, tree and source text per key.

use crate::edit::{edit_in_bounds, line_edit};
use crate::error::HighlightError;
use std::collections::HashMap;
use std::fmt;
use tree_sitter::{Language, Parser, Tree};

/// How a [`ParseEntry`] was brought up to date by its last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// First parse for this entry.
    Initial,
    /// The old tree was edited and re-parsed incrementally.
    Incremental,
    /// Parsed from scratch after the incremental path could not be used.
    FullReparse,
    /// The text did not change; the tree was reused as is.
    Unchanged,
}

/// Cache key.
///
/// Keying by language alone shares one tree between every file of that language; add a file
/// name to keep separate trees per file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseKey {
    /// Language identifier.
    pub language: String,
    /// Optional file name.
    pub file: Option<String>,
}

impl ParseKey {
    /// One tree for every file of `language`.
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            file: None,
        }
    }

    /// A tree dedicated to `file`.
    pub fn for_file(language: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            file: Some(file.into()),
        }
    }
}

impl fmt::Display for ParseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", self.language, file),
            None => f.write_str(&self.language),
        }
    }
}

/// A parser together with its latest tree and the source that tree was parsed from.
pub struct ParseEntry {
    parser: Parser,
    tree: Tree,
    source: String,
    last_update_mode: UpdateMode,
}

impl ParseEntry {
    /// Parse `source` from scratch with a new parser for `language`.
    pub fn new(language: &Language, source: &str) -> Result<Self, HighlightError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| HighlightError::Language(e.to_string()))?;
        Self::with_parser(parser, source)
    }

    /// Parse `source` from scratch with an already configured parser.
    pub fn with_parser(mut parser: Parser, source: &str) -> Result<Self, HighlightError> {
        let tree = parser
            .parse(source, None)
            .ok_or(HighlightError::ParseFailed)?;
        Ok(Self {
            parser,
            tree,
            source: source.to_string(),
            last_update_mode: UpdateMode::Initial,
        })
    }

    /// Current tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Source text the current tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// How the last [`Self::new`] / [`Self::update`] produced the tree.
    pub fn last_update_mode(&self) -> UpdateMode {
        self.last_update_mode
    }

    /// Bring the tree up to date with `new_source`.
    ///
    /// The changed line region is applied to a copy of the old tree as a single edit and the
    /// parser reuses everything outside it. If that fails the text is parsed from scratch. On
    /// error the entry still holds the previous tree and source.
    pub fn update(&mut self, new_source: &str) -> Result<UpdateMode, HighlightError> {
        self.update_with(new_source, |parser, text, old_tree| parser.parse(text, old_tree))
    }

    fn update_with(
        &mut self,
        new_source: &str,
        mut parse: impl FnMut(&mut Parser, &str, Option<&Tree>) -> Option<Tree>,
    ) -> Result<UpdateMode, HighlightError> {
        let mode = match line_edit(&self.source, new_source) {
            None => UpdateMode::Unchanged,
            Some(edit) if edit_in_bounds(&edit, &self.source, new_source) => {
                let mut edited = self.tree.clone();
                edited.edit(&edit);
                match parse(&mut self.parser, new_source, Some(&edited)) {
                    Some(tree) => {
                        self.tree = tree;
                        UpdateMode::Incremental
                    }
                    None => self.reparse_from_scratch(new_source, &mut parse)?,
                }
            }
            Some(edit) => {
                tracing::debug!(
                    start_byte = edit.start_byte,
                    old_end_byte = edit.old_end_byte,
                    new_end_byte = edit.new_end_byte,
                    "edit out of range, parsing from scratch"
                );
                self.reparse_from_scratch(new_source, &mut parse)?
            }
        };

        if mode != UpdateMode::Unchanged {
            self.source = new_source.to_string();
        }
        self.last_update_mode = mode;
        Ok(mode)
    }

    fn reparse_from_scratch(
        &mut self,
        new_source: &str,
        parse: &mut impl FnMut(&mut Parser, &str, Option<&Tree>) -> Option<Tree>,
    ) -> Result<UpdateMode, HighlightError> {
        tracing::debug!("parsing from scratch");
        self.parser.reset();
        self.tree = parse(&mut self.parser, new_source, None).ok_or(HighlightError::ParseFailed)?;
        Ok(UpdateMode::FullReparse)
    }
}

/// Caller-owned cache of [`ParseEntry`] values.
///
/// Entries live until removed. Updating an entry mutates its tree in place, so callers sharing
/// a cache across threads must serialize access per key (e.g. wrap it in a `Mutex`).
#[derive(Default)]
pub struct ParseCache {
    entries: HashMap<ParseKey, ParseEntry>,
}

impl ParseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `key`, if one exists.
    pub fn get(&self, key: &ParseKey) -> Option<&ParseEntry> {
        self.entries.get(key)
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &ParseKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the entry for `key`.
    pub fn remove(&mut self, key: &ParseKey) -> Option<ParseEntry> {
        self.entries.remove(key)
    }

    /// Parse `source` for `key`: incrementally when an entry exists, otherwise from scratch with
    /// `language`.
    ///
    /// An existing entry keeps the parser it was created with; `language` is only needed the
    /// first time.
    pub fn sync(
        &mut self,
        key: ParseKey,
        source: &str,
        language: Option<&Language>,
    ) -> Result<&ParseEntry, HighlightError> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                entry.update(source)?;
                Ok(entry)
            }
            Entry::Vacant(vacant) => {
                let Some(language) = language else {
                    return Err(HighlightError::MissingLanguage(vacant.key().to_string()));
                };
                let entry = ParseEntry::new(language, source)?;
                Ok(vacant.insert(entry))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rust_entry(source: &str) -> ParseEntry {
        ParseEntry::new(&tree_sitter_rust::LANGUAGE.into(), source).unwrap()
    }

    #[test]
    fn test_failed_update_keeps_tree_and_source_together() {
        let old = "fn a() {}\n";
        let mut entry = rust_entry(old);

        let err = entry
            .update_with("fn a() { let x = 1; }\n", |_, _, _| None)
            .unwrap_err();
        assert!(matches!(err, HighlightError::ParseFailed));
        assert_eq!(entry.source(), old);
        assert_eq!(entry.tree().root_node().end_byte(), old.len());
        assert_eq!(entry.last_update_mode(), UpdateMode::Initial);

        let new = "fn b() {}\n";
        assert_eq!(entry.update(new).unwrap(), UpdateMode::Incremental);
        let root = entry.tree().root_node();
        assert_eq!(root.end_byte(), new.len());
        assert!(!root.has_error());
    }

    #[test]
    fn test_failed_incremental_parse_falls_back_to_full_parse() {
        let mut entry = rust_entry("fn a() {}\n");
        let new = "fn a() {}\nfn b() {}\n";

        let mode = entry
            .update_with(new, |parser, text, old_tree| match old_tree {
                Some(_) => None,
                None => parser.parse(text, None),
            })
            .unwrap();
        assert_eq!(mode, UpdateMode::FullReparse);
        assert_eq!(entry.source(), new);
        assert_eq!(entry.tree().root_node().named_child_count(), 2);
    }
}
