//! Log sinks that separate emitting a message from writing it out.
//!
//! A sink accepts `(message, mode)` pairs and hands each one to a logging
//! action supplied at construction. Two flavours are provided:
//!
//! - [`AsyncLogSink`] queues messages for a dedicated worker thread. `log`
//!   returns immediately and `close` blocks until everything accepted has
//!   been handled.
//! - [`SyncLogSink`] runs the action under a lock on the caller's thread, so
//!   a message is committed by the time `log` returns.
//!
//! Both run actions one at a time in acceptance order, run the close action
//! exactly once, and ignore messages logged after close. [`WritableFile`] is
//! the file abstraction the file-backed sinks write through.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod action;
mod async_sink;
mod error;
mod pending;
mod qos;
mod sink;
mod sync_sink;
mod writable_file;

pub use action::{CloseAction, LoggingAction};
pub use async_sink::{AsyncLogSink, AsyncLogSinkBuilder};
pub use error::{Error, Result};
pub use pending::PendingWork;
pub use qos::QualityOfService;
pub use sink::LogSink;
pub use sync_sink::SyncLogSink;
pub use writable_file::WritableFile;
