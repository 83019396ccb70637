//! Error types for query compilation and evaluation.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Unsupported comparator: {0}")]
    UnsupportedComparator(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid descriptor {path}: {1}", path = .0.display())]
    InvalidDescriptor(PathBuf, String),
}

pub type Result<T> = std::result::Result<T, Error>;
