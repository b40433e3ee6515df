//! Asynchronous file sink

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use logsink::{AsyncLogSink, LogSink};

use crate::actions::{self, SharedFile};
use crate::config::FileSinkConfig;
use crate::error::Result;

/// Sink writing one line per message to a file from a background worker.
///
/// Lines reach the file in the order messages were accepted; everything
/// accepted is on disk once [`close`](Self::close) returns. The mode is not
/// written.
pub struct FileSink<M, D> {
    path: PathBuf,
    file: SharedFile,
    sink: AsyncLogSink<M, D>,
}

impl<M, D> FileSink<M, D>
where
    M: Display + Send + 'static,
    D: Send + 'static,
{
    /// Opens the sink with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the path is unusable, if the file cannot be opened (blocking
    /// mode opens it right away) or if the worker cannot start.
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        let file = actions::open(&config)?;
        let sink = AsyncLogSink::builder()
            .thread_name("logsink-file")
            .logging_action(actions::logging_action(file.clone()))
            .close_action(actions::close_action(file.clone()))
            .build()?;

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

impl<M, D> FileSink<M, D> {
    /// Queues a message for writing.
    pub fn log(&self, message: M, mode: Option<D>) {
        self.sink.log(message, mode);
    }

    /// Writes everything queued, syncs and closes the file.
    pub fn close(&self) {
        self.sink.close();
    }

    /// The file written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file handle is held once all queued messages are written.
    #[must_use]
    pub fn holds_handle(&self) -> bool {
        self.sink.barrier();
        self.file.lock().is_open()
    }
}

impl<M, D> LogSink<M, D> for FileSink<M, D>
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

impl<M, D> fmt::Debug for FileSink<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
