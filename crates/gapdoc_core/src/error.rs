//! Error types for the document facade.
use crate::position::TextPos;
use thiserror::Error;

/// Top-level document error type.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Position {pos} is outside the document ({line_count} lines)")]
    PositionOutOfRange {
        pos: TextPos,
        line_count: usize,
        /// Length of the addressed line when it exists.
        line_len: Option<usize>,
    },

    #[error("Document must contain at least one line")]
    EmptyDocument,

    #[error("Line {line_index} contains a line terminator")]
    LineContainsNewline { line_index: usize },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used by the public document API.
pub type Result<T> = std::result::Result<T, DocumentError>;
