//! Token model
//!
//! A token is a position (1-indexed line, 0-indexed byte column), a length in bytes and a
//! generic [`Category`]. Every highlighter in the workspace produces the same token type, so
//! results from tree-sitter, the regex fallback and the worker process can be mixed freely.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generic highlight category.
///
/// The set is closed and shared by every language; per-language tables translate parser node
/// types into these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Whitespace runs.
    Whitespace,
    /// Plain text.
    Text,
    /// Syntax errors or invalid input.
    Error,
    /// Language keywords.
    Keyword,
    /// Identifiers.
    Name,
    /// String literals.
    String,
    /// Numeric literals.
    Number,
    /// Other literals (booleans, null, ...).
    Literal,
    /// Operators.
    Operator,
    /// Punctuation and delimiters.
    Punctuation,
    /// Comments.
    Comment,
    /// Generic markup (headings, emphasis, ...).
    Generic,
    /// A web link.
    Link,
    /// Invisible characters such as zero-width spaces.
    #[serde(rename = "Hidden_Char")]
    HiddenChar,
    /// Definitions.
    Definition,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 15] = [
        Category::Whitespace,
        Category::Text,
        Category::Error,
        Category::Keyword,
        Category::Name,
        Category::String,
        Category::Number,
        Category::Literal,
        Category::Operator,
        Category::Punctuation,
        Category::Comment,
        Category::Generic,
        Category::Link,
        Category::HiddenChar,
        Category::Definition,
    ];

    /// Wire name of the category (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Whitespace => "Whitespace",
            Category::Text => "Text",
            Category::Error => "Error",
            Category::Keyword => "Keyword",
            Category::Name => "Name",
            Category::String => "String",
            Category::Number => "Number",
            Category::Literal => "Literal",
            Category::Operator => "Operator",
            Category::Punctuation => "Punctuation",
            Category::Comment => "Comment",
            Category::Generic => "Generic",
            Category::Link => "Link",
            Category::HiddenChar => "Hidden_Char",
            Category::Definition => "Definition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Token position: 1-indexed line, 0-indexed byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenPosition {
    /// Line number (1-based).
    pub line: usize,
    /// Column (0-based, UTF-8 bytes).
    pub column: usize,
}

impl TokenPosition {
    /// Create a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A highlighted span on a single line.
///
/// Serialized as the tuple `[[line, column], length, "Category"]`, which is the shape the worker
/// process uses in highlight results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TokenRepr", into = "TokenRepr")]
pub struct Token {
    position: TokenPosition,
    length: usize,
    category: Category,
}

type TokenRepr = ((usize, usize), usize, Category);

impl From<TokenRepr> for Token {
    fn from(((line, column), length, category): TokenRepr) -> Self {
        Token::new(line, column, length, category)
    }
}

impl From<Token> for TokenRepr {
    fn from(token: Token) -> Self {
        (
            (token.position.line, token.position.column),
            token.length,
            token.category,
        )
    }
}

impl Token {
    /// Create a token at `(line, column)` spanning `length` bytes.
    pub const fn new(line: usize, column: usize, length: usize, category: Category) -> Self {
        Self {
            position: TokenPosition::new(line, column),
            length,
            category,
        }
    }

    /// Start position.
    pub fn position(&self) -> TokenPosition {
        self.position
    }

    /// Line number (1-based).
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Start column (0-based).
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end column.
    pub fn end_column(&self) -> usize {
        self.position.column + self.length
    }

    /// Highlight category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether `other` can be folded into this token: same category, same line and touching or
    /// overlapping columns.
    pub fn is_mergeable_with(&self, other: &Token) -> bool {
        self.category == other.category
            && self.line() == other.line()
            && self.column() <= other.end_column()
            && other.column() <= self.end_column()
    }

    /// Whether this token's span lies entirely inside `other`'s span on the same line.
    pub fn is_within(&self, other: &Token) -> bool {
        self.line() == other.line()
            && other.column() <= self.column()
            && self.end_column() <= other.end_column()
    }
}
