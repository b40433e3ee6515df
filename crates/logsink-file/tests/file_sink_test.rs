use std::fmt;
use std::fs;

use logsink::LogSink;
use logsink_file::{Error, FileCrashSink, FileSink, FileSinkConfig};
use tempfile::tempdir;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Error,
}

struct Step(u32);

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reached step {}", self.0)
    }
}

#[test]
fn test_one_line_per_message_without_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");

    let sink: FileSink<&str, Mode> = FileSink::open(&path).unwrap();
    sink.log("starting", None);
    sink.log("something broke", Some(Mode::Error));
    sink.close();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "starting\nsomething broke\n"
    );
}

#[test]
fn test_close_drains_everything_queued() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("busy.log");

    let sink: FileSink<String, Mode> = FileSink::open(&path).unwrap();
    for n in 0..500 {
        sink.log(format!("line {n}"), None);
    }
    sink.close();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 500);
    assert_eq!(lines[0], "line 0");
    assert_eq!(lines[499], "line 499");
}

#[test]
fn test_append_keeps_previous_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.log");
    fs::write(&path, "yesterday\n").unwrap();

    let config = FileSinkConfig::builder(&path).append(true).build();
    let sink: FileSink<&str, Mode> = FileSink::new(config).unwrap();
    sink.log("today", None);
    sink.close();

    assert_eq!(fs::read_to_string(&path).unwrap(), "yesterday\ntoday\n");
}

#[test]
fn test_truncate_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fresh.log");
    fs::write(&path, "stale\n").unwrap();

    let sink: FileSink<&str, Mode> = FileSink::open(&path).unwrap();
    sink.log("new", None);
    sink.close();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn test_blocking_holds_handle_until_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("held.log");

    let sink: FileSink<&str, Mode> = FileSink::open(&path).unwrap();
    sink.log("one", None);
    assert!(sink.holds_handle());

    sink.close();
    assert!(!sink.holds_handle());
}

#[test]
fn test_non_blocking_releases_handle_between_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("released.log");

    let config = FileSinkConfig::builder(&path).blocking(false).build();
    let sink: FileSink<&str, Mode> = FileSink::new(config).unwrap();
    assert!(!path.exists());

    sink.log("one", None);
    assert!(!sink.holds_handle());
    sink.log("two", None);
    sink.close();

    assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
}

#[test]
fn test_unopenable_file_fails_construction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("app.log");

    let err = FileSink::<&str, Mode>::open(&path).unwrap_err();

    assert!(matches!(err, Error::Sink(logsink::Error::Io { .. })));
    assert!(err.to_string().contains("app.log"));
}

#[test]
fn test_directory_path_is_rejected() {
    let dir = tempdir().unwrap();

    let err = FileCrashSink::<&str, Mode>::open(dir.path()).unwrap_err();

    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[test]
fn test_crash_sink_writes_before_log_returns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crash.log");

    let sink: FileCrashSink<Step, Mode> = FileCrashSink::open(&path).unwrap();
    sink.log(Step(1), None);
    sink.log(Step(2), None);

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "reached step 1\nreached step 2\n"
    );
    assert!(sink.holds_handle());

    sink.close();
    sink.log(Step(3), None);
    assert!(!sink.holds_handle());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "reached step 1\nreached step 2\n"
    );
}

#[test]
fn test_file_sinks_behind_trait_objects() {
    let dir = tempdir().unwrap();
    let queued = dir.path().join("queued.log");
    let direct = dir.path().join("direct.log");

    let sinks: Vec<Box<dyn LogSink<String, Mode>>> = vec![
        Box::new(FileSink::open(&queued).unwrap()),
        Box::new(FileCrashSink::open(&direct).unwrap()),
    ];
    for sink in &sinks {
        sink.log_message("hello".to_string());
        sink.close();
    }

    assert_eq!(fs::read_to_string(&queued).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(&direct).unwrap(), "hello\n");
}
