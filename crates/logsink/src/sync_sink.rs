//! Sink that runs its logging action on the caller's thread.

use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

use crate::action::{Actions, CloseAction, LoggingAction};
use crate::sink::LogSink;

/// Synchronous sink for events that must be committed before the caller
/// moves on, e.g. a crash log of executed steps.
///
/// Every call takes the same lock, so actions never overlap and `log` only
/// returns once its action has finished. Calling back into the sink from one
/// of its own actions deadlocks.
pub struct SyncLogSink<M, D> {
    actions: Mutex<Actions<M, D>>,
}

impl<M, D> SyncLogSink<M, D> {
    /// Creates a sink with the given actions.
    #[must_use]
    pub fn new(logging: Option<LoggingAction<M, D>>, close: Option<CloseAction>) -> Self {
        Self {
            actions: Mutex::new(Actions::new(logging, close)),
        }
    }

    /// Creates a sink from closures.
    #[must_use]
    pub fn with_actions<L, C>(logging: L, close: C) -> Self
    where
        L: FnMut(M, Option<D>) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        Self::new(Some(Box::new(logging)), Some(Box::new(close)))
    }

    /// Runs the logging action and returns once it has finished.
    pub fn log(&self, message: M, mode: Option<D>) {
        self.actions.lock().log(message, mode);
    }

    /// Runs the close action once and releases both actions.
    pub fn close(&self) {
        if self.actions.lock().close() {
            debug!("sink closed");
        }
    }

    /// Replaces the logging action. Has no effect once the sink is closed.
    pub fn set_logging_action<F>(&self, action: F)
    where
        F: FnMut(M, Option<D>) + Send + 'static,
    {
        self.actions.lock().set_logging(Box::new(action));
    }

    /// Replaces the close action. Has no effect once the sink is closed.
    pub fn set_close_action<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.lock().set_close(Box::new(action));
    }

    /// Whether the sink has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.actions.lock().is_closed()
    }
}

impl<M, D> Default for SyncLogSink<M, D> {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<M, D> LogSink<M, D> for SyncLogSink<M, D>
where
    M: Send,
    D: Send,
{
    fn log(&self, message: M, mode: Option<D>) {
        Self::log(self, message, mode);
    }

    fn close(&self) {
        Self::close(self);
    }
}

impl<M, D> Drop for SyncLogSink<M, D> {
    fn drop(&mut self) {
        self.actions.get_mut().close();
    }
}

impl<M, D> fmt::Debug for SyncLogSink<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncLogSink")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
