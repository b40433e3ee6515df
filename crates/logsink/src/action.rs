//! Action callbacks and the closed-state bookkeeping shared by both sinks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

/// Callback invoked once per accepted log call.
pub type LoggingAction<M, D> = Box<dyn FnMut(M, Option<D>) + Send>;

/// Callback invoked once, when the sink is first closed.
pub type CloseAction = Box<dyn FnOnce() + Send>;

/// The actions of a sink together with its write-once closed flag.
///
/// Whoever owns this value is the sink's serialization point: the worker
/// thread for [`AsyncLogSink`](crate::AsyncLogSink), the mutex for
/// [`SyncLogSink`](crate::SyncLogSink).
pub(crate) struct Actions<M, D> {
    logging: Option<LoggingAction<M, D>>,
    close: Option<CloseAction>,
    closed: bool,
}

impl<M, D> Actions<M, D> {
    pub(crate) fn new(logging: Option<LoggingAction<M, D>>, close: Option<CloseAction>) -> Self {
        Self {
            logging,
            close,
            closed: false,
        }
    }

    pub(crate) const fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn log(&mut self, message: M, mode: Option<D>) {
        if self.closed {
            return;
        }

        if let Some(action) = self.logging.as_mut()
            && let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| action(message, mode)))
        {
            error!(
                panic = %panic_message(payload.as_ref()),
                "logging action panicked, message dropped"
            );
        }
    }

    /// Runs the close action if this is the first close. Returns whether it
    /// did anything.
    pub(crate) fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }

        if let Some(action) = self.close.take()
            && let Err(payload) = panic::catch_unwind(AssertUnwindSafe(action))
        {
            error!(panic = %panic_message(payload.as_ref()), "close action panicked");
        }

        self.closed = true;
        drop(self.logging.take());
        true
    }

    // The new action is in place before the old one is dropped.
    pub(crate) fn set_logging(&mut self, action: LoggingAction<M, D>) {
        if !self.closed {
            drop(self.logging.replace(action));
        }
    }

    pub(crate) fn set_close(&mut self, action: CloseAction) {
        if !self.closed {
            drop(self.close.replace(action));
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
