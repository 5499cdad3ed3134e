//! Error types for csvmap-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csvmap-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The decoder found no header or no data rows
    #[error("no data found in CSV '{path}'")]
    EmptyInput { path: PathBuf },

    /// An action name that is not normal, combine or separate
    #[error("unknown mapping action '{0}' (expected normal, combine or separate)")]
    UnknownAction(String),

    /// Rule index out of range
    #[error("mapping rule {index} does not exist ({len} rules defined)")]
    RuleIndex { index: usize, len: usize },

    /// Attempt to remove the only remaining rule
    #[error("cannot remove the last mapping rule")]
    LastRule,

    /// Operation requires a loaded CSV
    #[error("no CSV data loaded")]
    NoData,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoded output was not valid UTF-8
    #[error("encoded CSV is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
