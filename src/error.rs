//! Error types for seqfetch

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for seqfetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Error types that can occur in seqfetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw data file or index file is absent
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that could not be opened
        path: PathBuf,
    },

    /// Index file exists but contains no entries
    #[error("index file is empty: {path}")]
    IndexEmpty {
        /// Path of the empty index file
        path: PathBuf,
    },

    /// Invalid FASTA format
    #[error("invalid FASTA format at line {line}: {msg}")]
    InvalidFastaFormat {
        /// Line number where the error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// The record parser could not materialize a record at an offset
    #[error("parse failure at offset {offset}: {msg}")]
    ParseFailure {
        /// Byte offset the parse was attempted at
        offset: u64,
        /// Error message
        msg: String,
    },

    /// Invalid input (malformed index line, bad configuration)
    #[error("invalid input: {msg}")]
    InvalidInput {
        /// Error message
        msg: String,
    },
}

impl FetchError {
    /// True for conditions that degrade a backend to "cannot answer"
    /// rather than failing a fetch: absent files and empty indexes.
    pub fn is_degraded(&self) -> bool {
        match self {
            FetchError::FileNotFound { .. } | FetchError::IndexEmpty { .. } => true,
            FetchError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
