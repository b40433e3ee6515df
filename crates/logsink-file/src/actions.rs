//! Logging and close actions that write through a shared [`WritableFile`].

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use logsink::WritableFile;
use parking_lot::Mutex;
use tracing::warn;

use crate::config::FileSinkConfig;
use crate::error::Result;

pub(crate) type SharedFile = Arc<Mutex<WritableFile>>;

pub(crate) fn open(config: &FileSinkConfig) -> Result<SharedFile> {
    config.validate()?;
    let file = WritableFile::new(&config.path, config.append, config.blocking)?;
    Ok(Arc::new(Mutex::new(file)))
}

/// Writes each message as one line. Failures are reported and swallowed so
/// later messages still get their chance.
pub(crate) fn logging_action<M, D>(file: SharedFile) -> impl FnMut(M, Option<D>) + Send + 'static
where
    M: Display,
{
    move |message, _mode| {
        let mut file = file.lock();
        if let Err(error) = file.write(&message.to_string(), true) {
            report(&file, &error);
        }
    }
}

/// Syncs and releases the handle.
pub(crate) fn close_action(file: SharedFile) -> impl FnOnce() + Send + 'static {
    move || {
        let mut file = file.lock();
        if let Err(error) = file.close() {
            report(&file, &error);
        }
    }
}

fn report(file: &WritableFile, error: &logsink::Error) {
    warn!(path = %file.path().display(), %error, "could not log to file");
    let _ = writeln!(
        io::stderr(),
        "could not log to {}: {error}",
        file.path().display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_write_failure_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig::builder(dir.path().join("gone").join("app.log"))
            .blocking(false)
            .build();
        let file = open(&config).unwrap();

        let mut action = logging_action::<&str, ()>(file.clone());
        action("first", None);
        action("second", None);

        assert!(logs_contain("could not log to file"));
        assert!(logs_contain("app.log"));
        assert!(!file.lock().is_open());
    }

    #[test]
    fn test_actions_share_one_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let file = open(&FileSinkConfig::new(&path)).unwrap();

        let mut log = logging_action::<u32, ()>(file.clone());
        log(1, None);
        log(2, None);
        close_action(file.clone())();

        assert!(!file.lock().is_open());
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n");
    }
}
