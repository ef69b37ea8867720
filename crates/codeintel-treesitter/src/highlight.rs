use crate::cache::{ParseCache, ParseKey};
use crate::error::HighlightError;
use crate::mapping::NodeMapping;
use crate::walker::node_to_tokens;
use codeintel_core::{ReferenceHighlighter, TextRange, Token, special_tokens, tokens_in_range};
use tree_sitter::Language;

/// Input for [`TreeSitterHighlighter::highlight`].
#[derive(Clone, Copy)]
pub struct HighlightRequest<'a> {
    /// Full document text.
    pub text: &'a str,
    /// Language identifier (cache key and reference highlighter language).
    pub language: &'a str,
    /// Optional file name; when set the document gets its own cached tree.
    pub file: Option<&'a str>,
    /// Node-type mapping. Without one, the reference highlighter is used.
    pub mapping: Option<&'a NodeMapping>,
    /// Grammar, needed the first time a key is parsed.
    pub grammar: Option<&'a Language>,
    /// Lines to return tokens for.
    pub range: TextRange,
}

impl<'a> HighlightRequest<'a> {
    /// Request for all lines of `text`, no mapping and no grammar.
    pub fn new(text: &'a str, language: &'a str) -> Self {
        Self {
            text,
            language,
            file: None,
            mapping: None,
            grammar: None,
            range: TextRange::all(),
        }
    }

    /// Use `mapping` to translate node types.
    pub fn with_mapping(mut self, mapping: &'a NodeMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Parse with `grammar` when no tree is cached yet.
    pub fn with_grammar(mut self, grammar: &'a Language) -> Self {
        self.grammar = Some(grammar);
        self
    }

    /// Only return tokens on lines in `range`.
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    /// Keep a separate tree for `file`.
    pub fn for_file(mut self, file: &'a str) -> Self {
        self.file = Some(file);
        self
    }

    fn key(&self) -> ParseKey {
        match self.file {
            Some(file) => ParseKey::for_file(self.language, file),
            None => ParseKey::language(self.language),
        }
    }
}

/// Incremental tree-sitter highlighter.
///
/// Keeps a [`ParseCache`] across calls so each request only re-parses the lines that changed
/// since the previous request for the same key. Languages without a mapping are delegated to
/// the reference highlighter `H`.
pub struct TreeSitterHighlighter<H> {
    cache: ParseCache,
    reference: H,
}

impl<H: ReferenceHighlighter> TreeSitterHighlighter<H> {
    /// Create a highlighter with an empty cache.
    pub fn new(reference: H) -> Self {
        Self {
            cache: ParseCache::new(),
            reference,
        }
    }

    /// The parse-tree cache.
    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Mutable access to the parse-tree cache.
    pub fn cache_mut(&mut self) -> &mut ParseCache {
        &mut self.cache
    }

    /// The reference highlighter.
    pub fn reference(&self) -> &H {
        &self.reference
    }

    /// Highlight `request.text`.
    ///
    /// With a mapping, the cached tree is brought up to date and its leaves are tokenized, links
    /// and hidden characters are added, and the result is limited to `request.range`.
    ///
    /// Without a mapping the reference highlighter's tokens are returned as is. The tree cache
    /// is still updated when a grammar or an existing entry is available, so a later request
    /// with a mapping starts from a warm tree.
    pub fn highlight(
        &mut self,
        request: HighlightRequest<'_>,
    ) -> Result<Vec<Token>, HighlightError> {
        let key = request.key();

        let Some(mapping) = request.mapping else {
            let tokens = self
                .reference
                .highlight(request.text, request.language, request.range);

            if (request.grammar.is_some() || self.cache.contains(&key))
                && let Err(err) = self.cache.sync(key, request.text, request.grammar)
            {
                tracing::debug!(language = request.language, %err, "opportunistic parse failed");
            }
            return Ok(tokens);
        };

        let entry = self.cache.sync(key, request.text, request.grammar)?;
        tracing::trace!(
            language = request.language,
            mode = ?entry.last_update_mode(),
            "parse tree synced"
        );

        let mut tokens = node_to_tokens(entry.tree().root_node(), entry.source(), mapping);
        tokens.extend(special_tokens(request.text, request.range));
        tokens.sort_by_key(|t| t.position());
        Ok(tokens_in_range(tokens, request.range))
    }
}
