//! Error types for tree sources and the extraction engine.

use thiserror::Error;

/// Raised by a Tree Source when text cannot be turned into a `SyntaxTree`.
/// The engine is never invoked on a failed parse.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{language} syntax error at line {line}, column {column}: unexpected `{snippet}`")]
    Syntax {
        language: String,
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("invalid ESTree JSON: {0}")]
    InvalidJson(String),

    #[error("ESTree JSON root must be an object or null, found {0}")]
    UnexpectedRoot(&'static str),

    #[error("failed to load {language} grammar: {message}")]
    Grammar { language: String, message: String },
}

/// The only failures the engine itself can originate.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    /// Traversal stopped at a node deeper than the configured limit. No
    /// partial inventory is returned.
    #[error("syntax tree exceeds maximum depth of {limit} (at `{kind}` node)")]
    DepthExceeded { limit: usize, kind: String },
}
