//! Configuration for file-backed sinks

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where and how a file sink writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Log file path
    pub path: PathBuf,
    /// Keep existing content instead of starting from an empty file
    #[serde(default)]
    pub append: bool,
    /// Keep the file open between writes. When false the file is reopened
    /// and closed for every message.
    #[serde(default = "default_blocking")]
    pub blocking: bool,
}

const fn default_blocking() -> bool {
    true
}

impl FileSinkConfig {
    /// Configuration for `path` with defaults: truncate, keep open.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
            blocking: default_blocking(),
        }
    }

    /// Starts a builder for `path`.
    #[must_use]
    pub fn builder(path: impl Into<PathBuf>) -> FileSinkConfigBuilder {
        FileSinkConfigBuilder {
            config: Self::new(path),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let reason = if self.path.as_os_str().is_empty() {
            "path is empty"
        } else if self.path.is_dir() {
            "path is a directory"
        } else {
            return Ok(());
        };

        Err(Error::InvalidPath {
            path: self.path.clone(),
            reason,
        })
    }
}

/// Builder for [`FileSinkConfig`].
#[derive(Debug, Clone)]
pub struct FileSinkConfigBuilder {
    config: FileSinkConfig,
}

impl FileSinkConfigBuilder {
    /// Keep existing content.
    #[must_use]
    pub const fn append(mut self, append: bool) -> Self {
        self.config.append = append;
        self
    }

    /// Keep the file open between writes.
    #[must_use]
    pub const fn blocking(mut self, blocking: bool) -> Self {
        self.config.blocking = blocking;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> FileSinkConfig {
        self.config
    }
}
