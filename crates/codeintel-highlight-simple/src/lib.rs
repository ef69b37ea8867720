//! `codeintel-highlight-simple` - Simple (regex-based) reference highlighting.
//!
//! This crate is the fallback for languages without a tree-sitter mapping, and the reference
//! token source the mapping bootstrapper correlates parse trees against. It is *not* a parser:
//! every rule runs line by line, and the first rule to claim a span wins.

use codeintel_core::{Category, ReferenceHighlighter, TextRange, Token};
use regex::Regex;
use std::collections::HashMap;

/// A single regex highlighting rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    category: Category,
    capture_group: Option<usize>,
}

impl RegexRule {
    pub fn new(pattern: &str, category: Category) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            category,
            capture_group: None,
        })
    }

    /// Highlight only a capture group of each match.
    ///
    /// Example (INI key):
    /// - pattern: `^\\s*([^=\\s]+)\\s*=`
    /// - capture_group: `1` (the key)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// A simple regex-based syntax highlighter.
#[derive(Debug, Clone, Default)]
pub struct RegexHighlighter {
    rules: Vec<RegexRule>,
}

impl RegexHighlighter {
    pub fn new(rules: Vec<RegexRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// Run all rules over the lines of `text` covered by `range`.
    ///
    /// Rules are tried in order; a match overlapping a span claimed by an earlier rule is
    /// dropped, so list comments and strings before keywords and numbers.
    pub fn highlight(&self, text: &str, range: TextRange) -> Vec<Token> {
        let mut tokens = Vec::new();

        for (idx, line_text) in text.lines().enumerate() {
            let line = idx + 1;
            if !range.contains_line(line) {
                continue;
            }

            let mut claimed: Vec<(usize, usize)> = Vec::new();
            for rule in &self.rules {
                if let Some(group) = rule.capture_group {
                    for caps in rule.regex.captures_iter(line_text) {
                        let Some(m) = caps.get(group) else {
                            continue;
                        };
                        push_match(&mut tokens, &mut claimed, line, m.start(), m.end(), rule);
                    }
                } else {
                    for m in rule.regex.find_iter(line_text) {
                        push_match(&mut tokens, &mut claimed, line, m.start(), m.end(), rule);
                    }
                }
            }
        }

        tokens.sort_by_key(|t| t.position());
        tokens
    }

    /// A small default JSON grammar (strings, numbers, booleans, null).
    pub fn json_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            // Object key: "key":
            RegexRule::new(r#"("(?:\\.|[^"\\])*")\s*:"#, Category::Name)?.with_capture_group(1),
            // JSON string (single-line, handles escapes)
            RegexRule::new(r#""(?:\\.|[^"\\])*""#, Category::String)?,
            // JSON number
            RegexRule::new(r#"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?"#, Category::Number)?,
            // JSON boolean / null
            RegexRule::new(r#"\b(?:true|false|null)\b"#, Category::Literal)?,
            RegexRule::new(r#"[{}\[\],:]"#, Category::Punctuation)?,
        ]))
    }

    /// A small default INI grammar (comment, section, key).
    pub fn ini_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            // Comment: ;... or #...
            RegexRule::new(r#"^\s*[;#].*$"#, Category::Comment)?,
            // Section header: [section]
            RegexRule::new(r#"^\s*\[([^\]]+)\]\s*$"#, Category::Keyword)?.with_capture_group(1),
            // Key: key = value
            RegexRule::new(r#"^\s*([^=\s]+)\s*="#, Category::Name)?.with_capture_group(1),
            RegexRule::new(r#"="#, Category::Operator)?,
        ]))
    }

    /// A generic grammar for C-like and script languages.
    ///
    /// `line_comment` is the line comment leader (`//`, `#`, `--`, ...).
    pub fn code_default(keywords: &[&str], line_comment: &str) -> Result<Self, regex::Error> {
        let mut rules = vec![
            RegexRule::new(&format!("{}.*$", regex::escape(line_comment)), Category::Comment)?,
            RegexRule::new(r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#, Category::String)?,
        ];
        if !keywords.is_empty() {
            let alternatives = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            rules.push(RegexRule::new(
                &format!(r"\b(?:{alternatives})\b"),
                Category::Keyword,
            )?);
        }
        rules.extend([
            RegexRule::new(
                r"\b(?:0[xX][0-9a-fA-F_]+|\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?)\b",
                Category::Number,
            )?,
            RegexRule::new(r"[A-Za-z_][A-Za-z0-9_]*", Category::Name)?,
            RegexRule::new(r"[-+*/%=<>!&|^~?]+", Category::Operator)?,
            RegexRule::new(r"[()\[\]{}.,;:]", Category::Punctuation)?,
        ]);
        Ok(Self::new(rules))
    }
}

fn push_match(
    tokens: &mut Vec<Token>,
    claimed: &mut Vec<(usize, usize)>,
    line: usize,
    start: usize,
    end: usize,
    rule: &RegexRule,
) {
    if start >= end {
        return;
    }
    if claimed.iter().any(|&(s, e)| start < e && s < end) {
        return;
    }
    claimed.push((start, end));
    tokens.push(Token::new(line, start, end - start, rule.category));
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "case", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

/// Per-language registry of [`RegexHighlighter`]s implementing [`ReferenceHighlighter`].
///
/// Language identifiers are matched case-insensitively. Unknown languages produce no tokens.
#[derive(Debug, Clone, Default)]
pub struct LanguageHighlighters {
    highlighters: HashMap<String, RegexHighlighter>,
}

impl LanguageHighlighters {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in JSON, INI, Python and Rust rule sets.
    pub fn with_defaults() -> Result<Self, regex::Error> {
        let mut registry = Self::new();
        registry.insert("json", RegexHighlighter::json_default()?);
        registry.insert("ini", RegexHighlighter::ini_default()?);
        registry.insert("python", RegexHighlighter::code_default(PYTHON_KEYWORDS, "#")?);
        registry.insert("rust", RegexHighlighter::code_default(RUST_KEYWORDS, "//")?);
        Ok(registry)
    }

    /// Register (or replace) the highlighter for `language`.
    pub fn insert(&mut self, language: &str, highlighter: RegexHighlighter) {
        self.highlighters
            .insert(language.to_ascii_lowercase(), highlighter);
    }

    /// Highlighter registered for `language`, compared case-insensitively.
    pub fn get(&self, language: &str) -> Option<&RegexHighlighter> {
        self.highlighters.get(&language.to_ascii_lowercase())
    }
}

impl ReferenceHighlighter for LanguageHighlighters {
    fn highlight(&self, text: &str, language: &str, range: TextRange) -> Vec<Token> {
        match self.get(language) {
            Some(highlighter) => highlighter.highlight(text, range),
            None => {
                tracing::debug!(language, "no reference highlighter registered");
                Vec::new()
            }
        }
    }
}
