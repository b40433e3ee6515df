//! Synchronous file sink for crash logs

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use logsink::{LogSink, SyncLogSink};

use crate::actions::{self, SharedFile};
use crate::config::FileSinkConfig;
use crate::error::Result;

/// Sink writing each message to a file before [`log`](Self::log) returns.
///
/// Meant for sparse "reached step X" records: if the process dies, the file
/// shows the last step that completed. Delete the file once the work is done
/// if it is no longer needed.
pub struct FileCrashSink<M, D> {
    path: PathBuf,
    file: SharedFile,
    sink: SyncLogSink<M, D>,
}

impl<M, D> FileCrashSink<M, D>
where
    M: Display + Send + 'static,
    D: Send + 'static,
{
    /// Opens the sink with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the path is unusable or, in blocking mode, if the file cannot
    /// be opened.
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        let file = actions::open(&config)?;
        let sink = SyncLogSink::with_actions(
            actions::logging_action(file.clone()),
            actions::close_action(file.clone()),
        );

        Ok(Self {
            path: config.path,
            file,
            sink,
        })
    }

    /// Opens `path`, truncating it and keeping it open between writes.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(FileSinkConfig::new(path))
    }
}

impl<M, D> FileCrashSink<M, D> {
    /// Writes the message and returns once it is in the file.
    pub fn log(&self, message: M, mode: Option<D>) {
        self.sink.log(message, mode);
    }

    /// Syncs and closes the file.
    pub fn close(&self) {
        self.sink.close();
    }

    /// The file written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file handle is currently held.
    #[must_use]
    pub fn holds_handle(&self) -> bool {
        self.file.lock().is_open()
    }
}

impl<M, D> LogSink<M, D> for FileCrashSink<M, D>
where
    M: Display + Send + 'static,
    D: Send + 'static,
{
    fn log(&self, message: M, mode: Option<D>) {
        Self::log(self, message, mode);
    }

    fn close(&self) {
        Self::close(self);
    }
}

impl<M, D> fmt::Debug for FileCrashSink<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCrashSink")
            .field("path", &self.path)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
