//! Error types shared by every pipeline stage

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum WikidexError {
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("Malformed feature table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("Insufficient data: clustering needs at least 2 documents, found {found}")]
    InsufficientData { found: usize },

    #[error("Dimension mismatch for {file_name}: expected {expected} values, found {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        file_name: String,
    },

    #[error("File name {0:?} cannot be stored in the feature table")]
    InvalidFileName(String),

    #[error("Index level {level} out of range, {levels} levels were computed")]
    InvalidLevel { level: usize, levels: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WikidexError>;
