use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for sink and file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A file operation failed.
    #[error("could not {operation} {}: {source}", .path.display())]
    Io {
        /// What was being attempted, e.g. "open to append".
        operation: &'static str,
        /// The file the operation targeted.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The sink worker thread could not be started.
    #[error("failed to spawn sink worker: {0}")]
    Spawn(#[source] io::Error),
}

impl Error {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
