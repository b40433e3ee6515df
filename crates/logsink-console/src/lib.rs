//! Sink that prints messages to standard output or standard error.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt::{self, Display};
use std::io::{self, Write};

use logsink::{AsyncLogSink, LogSink, Result};
use serde::{Deserialize, Serialize};

/// Where a printed message goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    /// Standard output.
    #[default]
    Standard,
    /// Standard error.
    Error,
}

/// Configuration for [`PrintSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSinkConfig {
    /// Print error-mode messages to standard output too.
    pub errors_to_standard: bool,
}

/// Sink printing one line per message.
///
/// Messages without a mode or in [`PrintMode::Standard`] go to standard
/// output, [`PrintMode::Error`] messages to standard error unless
/// `errors_to_standard` is set. Console write failures are ignored.
pub struct PrintSink<M> {
    config: PrintSinkConfig,
    sink: AsyncLogSink<M, PrintMode>,
}

impl<M> PrintSink<M>
where
    M: Display + Send + 'static,
{
    /// Creates a sink printing to the process's standard streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be started.
    pub fn new(errors_to_standard: bool) -> Result<Self> {
        Self::with_config(PrintSinkConfig { errors_to_standard })
    }

    /// Creates a sink from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be started.
    pub fn with_config(config: PrintSinkConfig) -> Result<Self> {
        Self::with_writers(config, io::stdout(), io::stderr())
    }

    /// Creates a sink printing to arbitrary writers in place of the standard
    /// streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be started.
    pub fn with_writers<O, E>(config: PrintSinkConfig, mut out: O, mut err: E) -> Result<Self>
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        let sink = AsyncLogSink::builder()
            .thread_name("logsink-console")
            .logging_action(move |message: M, mode| {
                let target: &mut dyn Write = match mode {
                    Some(PrintMode::Error) if !config.errors_to_standard => &mut err,
                    _ => &mut out,
                };
                let _ = writeln!(target, "{message}");
                let _ = target.flush();
            })
            .build()?;

        Ok(Self { config, sink })
    }

    /// Accepts a message.
    pub fn log(&self, message: M, mode: Option<PrintMode>) {
        self.sink.log(message, mode);
    }

    /// Prints everything accepted so far and stops the worker.
    pub fn close(&self) {
        self.sink.close();
    }

    /// The configuration the sink was built with.
    #[must_use]
    pub const fn config(&self) -> PrintSinkConfig {
        self.config
    }
}

impl<M> LogSink<M, PrintMode> for PrintSink<M>
where
    M: Display + Send + 'static,
{
    fn log(&self, message: M, mode: Option<PrintMode>) {
        Self::log(self, message, mode);
    }

    fn close(&self) {
        Self::close(self);
    }
}

impl<M> fmt::Debug for PrintSink<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintSink")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sink(errors_to_standard: bool) -> (SharedBuffer, SharedBuffer, PrintSink<String>) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = PrintSink::with_writers(
            PrintSinkConfig { errors_to_standard },
            out.clone(),
            err.clone(),
        )
        .unwrap();
        (out, err, sink)
    }

    #[test]
    fn test_routes_by_mode() {
        let (out, err, sink) = sink(false);

        sink.log("default".to_string(), None);
        sink.log("standard".to_string(), Some(PrintMode::Standard));
        sink.log("failure".to_string(), Some(PrintMode::Error));
        sink.close();

        assert_eq!(out.contents(), "default\nstandard\n");
        assert_eq!(err.contents(), "failure\n");
    }

    #[test]
    fn test_errors_to_standard_overrides_routing() {
        let (out, err, sink) = sink(true);

        sink.log("standard".to_string(), Some(PrintMode::Standard));
        sink.log("failure".to_string(), Some(PrintMode::Error));
        sink.close();

        assert_eq!(out.contents(), "standard\nfailure\n");
        assert_eq!(err.contents(), "");
        assert!(sink.config().errors_to_standard);
    }

    #[test]
    fn test_renders_display_lazily() {
        struct Step(u32);

        impl Display for Step {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "step {}", self.0)
            }
        }

        let out = SharedBuffer::default();
        let sink = PrintSink::with_writers(PrintSinkConfig::default(), out.clone(), io::sink())
            .unwrap();

        sink.log(Step(1), None);
        sink.log(Step(2), Some(PrintMode::Standard));
        sink.close();
        sink.log(Step(3), None);

        assert_eq!(out.contents(), "step 1\nstep 2\n");
    }

    #[test]
    fn test_config_defaults_when_fields_missing() {
        let config: PrintSinkConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.errors_to_standard);

        let mode: PrintMode = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(mode, PrintMode::Error);
    }
}
