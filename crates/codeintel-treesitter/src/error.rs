use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while parsing or highlighting with tree-sitter.
pub enum HighlightError {
    #[error("tree-sitter language error: {0}")]
    /// Installing the grammar on a parser failed (usually an ABI version mismatch).
    Language(String),

    #[error("no grammar given for '{0}' and no cached parse tree")]
    /// A mapping was supplied but there is neither a cached tree nor a grammar to build one.
    MissingLanguage(String),

    #[error("tree-sitter produced no tree")]
    /// The parser returned no tree.
    ParseFailed,
}

#[derive(Debug, Error)]
/// Errors produced while loading or saving a node-type mapping.
pub enum MappingError {
    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("mapping JSON error: {0}")]
    /// The mapping was not a JSON object of node type to category name.
    Json(#[from] serde_json::Error),
}
