//! Error types for file-backed sinks

use std::path::PathBuf;

/// Result type for file sink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when creating a file sink
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log file could not be opened, or the worker could not start
    #[error(transparent)]
    Sink(#[from] logsink::Error),

    /// The configured path cannot be used as a log file
    #[error("invalid log file path {}: {reason}", .path.display())]
    InvalidPath {
        /// The rejected path
        path: PathBuf,
        /// Why it was rejected
        reason: &'static str,
    },
}
