//! In-memory sink that collects every message it is given.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt;
use std::sync::Arc;

use logsink::{AsyncLogSink, LogSink, Result};
use parking_lot::Mutex;

/// Sink that appends every accepted message to an in-memory list.
///
/// Messages are collected on the sink's worker, so reads go through the
/// worker as well: [`messages`](Self::messages) returns everything logged
/// before the call, in order.
pub struct CollectingSink<M, D> {
    messages: Arc<Mutex<Vec<M>>>,
    sink: AsyncLogSink<M, D>,
}

impl<M, D> CollectingSink<M, D>
where
    M: Send + 'static,
    D: Send + 'static,
{
    /// Creates an empty collector.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be started.
    pub fn new() -> Result<Self> {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let collected = messages.clone();
        let sink = AsyncLogSink::builder()
            .thread_name("logsink-memory")
            .logging_action(move |message, _| collected.lock().push(message))
            .build()?;

        Ok(Self { messages, sink })
    }

    /// Accepts a message.
    pub fn log(&self, message: M, mode: Option<D>) {
        self.sink.log(message, mode);
    }

    /// Closes the underlying sink. Collected messages stay readable.
    pub fn close(&self) {
        self.sink.close();
    }

    /// Number of messages collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sink.barrier();
        self.messages.lock().len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M, D> CollectingSink<M, D>
where
    M: Clone + Send + 'static,
    D: Send + 'static,
{
    /// Snapshot of all collected messages, in acceptance order.
    #[must_use]
    pub fn messages(&self) -> Vec<M> {
        self.sink.barrier();
        self.messages.lock().clone()
    }
}

impl<M, D> LogSink<M, D> for CollectingSink<M, D>
where
    M: Send + 'static,
    D: Send + 'static,
{
    fn log(&self, message: M, mode: Option<D>) {
        Self::log(self, message, mode);
    }

    fn close(&self) {
        Self::close(self);
    }
}

impl<M, D> fmt::Debug for CollectingSink<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectingSink")
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
