//! Sink that runs its logging action on a dedicated worker thread.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use crate::action::{Actions, CloseAction, LoggingAction, panic_message};
use crate::error::{Error, Result};
use crate::pending::PendingWork;
use crate::qos::QualityOfService;
use crate::sink::LogSink;

enum Job<M, D> {
    Log(M, Option<D>),
    SetLogging(LoggingAction<M, D>),
    SetClose(CloseAction),
    Barrier(flume::Sender<()>),
    Close,
}

/// Asynchronous sink backed by one worker thread.
///
/// [`log`](Self::log) only enqueues; the worker runs the logging action for
/// each message in the order the sink accepted them. [`close`](Self::close)
/// blocks until everything accepted so far has run, runs the close action
/// once, and shuts the worker down. Dropping the sink closes it.
///
/// Calling `close` (or [`barrier`](Self::barrier)) from inside one of the
/// sink's own actions is a misuse; it is reported and ignored. If an action
/// drops the last handle to the sink, the close is queued behind the running
/// action instead of awaited.
pub struct AsyncLogSink<M, D> {
    sender: RwLock<Option<flume::Sender<Job<M, D>>>>,
    pending: Arc<PendingWork>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    quality_of_service: QualityOfService,
}

impl<M, D> AsyncLogSink<M, D>
where
    M: Send + 'static,
    D: Send + 'static,
{
    /// Returns a builder for configuring the sink.
    #[must_use]
    pub fn builder() -> AsyncLogSinkBuilder<M, D> {
        AsyncLogSinkBuilder::default()
    }

    /// Creates a sink with the given actions and default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the worker thread cannot be started.
    pub fn new(logging: Option<LoggingAction<M, D>>, close: Option<CloseAction>) -> Result<Self> {
        AsyncLogSinkBuilder {
            logging_action: logging,
            close_action: close,
            ..AsyncLogSinkBuilder::default()
        }
        .build()
    }

    /// Replaces the logging action for every message accepted after this call.
    pub fn set_logging_action<F>(&self, action: F)
    where
        F: FnMut(M, Option<D>) + Send + 'static,
    {
        self.submit(Job::SetLogging(Box::new(action)));
    }

    /// Replaces the close action. Has no effect once the sink is closed.
    pub fn set_close_action<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Job::SetClose(Box::new(action)));
    }

    fn run(receiver: flume::Receiver<Job<M, D>>, mut actions: Actions<M, D>, pending: &PendingWork) {
        debug!("sink worker started");

        for job in receiver.iter() {
            // Dropping caller-owned values (messages, replaced actions) can
            // panic outside the actions' own guards.
            let handled =
                panic::catch_unwind(AssertUnwindSafe(|| Self::handle(&mut actions, job)));
            if let Err(payload) = handled {
                error!(panic = %panic_message(payload.as_ref()), "sink job panicked");
            }
            pending.leave();
        }

        debug!(closed = actions.is_closed(), "sink worker stopped");
    }

    fn handle(actions: &mut Actions<M, D>, job: Job<M, D>) {
        match job {
            Job::Log(message, mode) => actions.log(message, mode),
            Job::SetLogging(action) => actions.set_logging(action),
            Job::SetClose(action) => actions.set_close(action),
            Job::Barrier(ack) => {
                let _ = ack.send(());
            }
            Job::Close => {
                if actions.close() {
                    debug!("sink closed");
                }
            }
        }
    }
}

impl<M, D> AsyncLogSink<M, D> {
    /// Enqueues a message. Returns immediately.
    pub fn log(&self, message: M, mode: Option<D>) {
        self.submit(Job::Log(message, mode));
    }

    /// Blocks until every message accepted before this call has been handled.
    pub fn barrier(&self) {
        if self.on_worker("barrier") {
            return;
        }

        let (ack, done) = flume::bounded(1);
        if self.submit(Job::Barrier(ack)) {
            // An error means the worker dropped the job while shutting down,
            // which also implies everything before it ran.
            let _ = done.recv();
        }
    }

    /// Drains all accepted messages, runs the close action and stops the
    /// worker. Calling it again does nothing.
    pub fn close(&self) {
        if self.on_worker("close") {
            return;
        }

        self.pending.wait();
        if !self.submit(Job::Close) {
            return;
        }
        self.pending.wait();

        drop(self.sender.write().take());
        if let Some(handle) = self.worker.lock().take()
            && handle.join().is_err()
        {
            error!("sink worker terminated abnormally");
        }
    }

    /// Whether [`close`](Self::close) has completed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// The scheduling hint the worker was started with.
    #[must_use]
    pub const fn quality_of_service(&self) -> QualityOfService {
        self.quality_of_service
    }

    fn submit(&self, job: Job<M, D>) -> bool {
        let sender = self.sender.read();
        let Some(sender) = sender.as_ref() else {
            return false;
        };

        self.pending.enter();
        if sender.send(job).is_err() {
            self.pending.leave();
            return false;
        }
        true
    }

    fn on_worker(&self, operation: &'static str) -> bool {
        let on_worker = thread::current().id() == self.worker_id;
        if on_worker {
            error!(operation, "called from the sink's own worker, ignoring");
        }
        on_worker
    }
}

impl<M, D> LogSink<M, D> for AsyncLogSink<M, D>
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

impl<M, D> Drop for AsyncLogSink<M, D> {
    fn drop(&mut self) {
        if thread::current().id() == self.worker_id {
            // Released from one of the sink's own actions: the worker drains
            // the close job once the action returns.
            self.submit(Job::Close);
            return;
        }
        self.close();
    }
}

impl<M, D> fmt::Debug for AsyncLogSink<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLogSink")
            .field("closed", &self.sender.read().is_none())
            .field("pending", &self.pending.pending())
            .field("quality_of_service", &self.quality_of_service)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AsyncLogSink`].
pub struct AsyncLogSinkBuilder<M, D> {
    logging_action: Option<LoggingAction<M, D>>,
    close_action: Option<CloseAction>,
    quality_of_service: QualityOfService,
    thread_name: Option<String>,
}

impl<M, D> Default for AsyncLogSinkBuilder<M, D> {
    fn default() -> Self {
        Self {
            logging_action: None,
            close_action: None,
            quality_of_service: QualityOfService::default(),
            thread_name: None,
        }
    }
}

impl<M, D> AsyncLogSinkBuilder<M, D>
where
    M: Send + 'static,
    D: Send + 'static,
{
    /// Sets the action run for each message.
    #[must_use]
    pub fn logging_action<F>(mut self, action: F) -> Self
    where
        F: FnMut(M, Option<D>) + Send + 'static,
    {
        self.logging_action = Some(Box::new(action));
        self
    }

    /// Sets the action run once on close.
    #[must_use]
    pub fn close_action<F>(mut self, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.close_action = Some(Box::new(action));
        self
    }

    /// Sets the scheduling hint for the worker.
    #[must_use]
    pub const fn quality_of_service(mut self, quality_of_service: QualityOfService) -> Self {
        self.quality_of_service = quality_of_service;
        self
    }

    /// Overrides the worker thread name (defaults to `logsink-<qos>`).
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Starts the worker and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the worker thread cannot be started.
    pub fn build(self) -> Result<AsyncLogSink<M, D>> {
        let (sender, receiver) = flume::unbounded();
        let pending = Arc::new(PendingWork::new());
        let actions = Actions::new(self.logging_action, self.close_action);

        let name = self
            .thread_name
            .unwrap_or_else(|| format!("logsink-{}", self.quality_of_service));
        let worker_pending = pending.clone();
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || AsyncLogSink::run(receiver, actions, &worker_pending))
            .map_err(Error::Spawn)?;

        Ok(AsyncLogSink {
            sender: RwLock::new(Some(sender)),
            pending,
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
            quality_of_service: self.quality_of_service,
        })
    }
}
