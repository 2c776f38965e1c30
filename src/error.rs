//! Error types for the diamond-seeds library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for seed search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while searching for seed orthologs.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The aligner executable could not be located
    #[error("{0} command not found in path")]
    ToolUnavailable(String),

    /// The aligner exited with a non-zero status
    #[error("Error running diamond: {0}")]
    InvocationFailure(String),

    /// Sequence input type is not one of the recognized kinds
    #[error("Unrecognized input type {0}.")]
    UnrecognizedInputType(String),

    /// A tabular line could not be parsed
    #[error("Malformed alignment record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The query FASTA could not be read
    #[error("Failed to parse FASTA input: {0}")]
    FastaParse(String),

    /// Invalid configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller-imposed deadline expired
    #[error("Search did not finish before the deadline")]
    Timeout,

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SearchError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
