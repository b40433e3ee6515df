//! File-backed log sinks
//!
//! This crate writes log messages to a plain text file, one line per message:
//! - [`FileSink`] queues messages and writes them from a background worker
//! - [`FileCrashSink`] writes each message before `log` returns
//!
//! Both support keeping the file open between writes (blocking) or reopening
//! it for every message (non-blocking), and truncating or appending on open.
//! Write failures after construction are reported on standard error and do
//! not stop the sink.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod actions;
mod config;
mod crash;
mod error;
mod sink;

pub use config::{FileSinkConfig, FileSinkConfigBuilder};
pub use crash::FileCrashSink;
pub use error::{Error, Result};
pub use sink::FileSink;
