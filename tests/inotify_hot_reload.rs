// tests/inotify_hot_reload.rs

mod common;
use crate::common::{CALLBACK_TIMEOUT, Recorder, init_tracing};

use std::fs;
use std::path::Path;

use firewatch::{FileWatcher, FirewatchError};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn path_str(path: &Path) -> String {
    path.to_str().expect("temp paths are UTF-8").to_string()
}

/// Write to a sentinel file and wait for its callback, so that every change
/// made before it has been dispatched.
fn flush(sentinel_path: &Path, sentinel: &Recorder) -> TestResult {
    let expected = sentinel.count() + 1;
    fs::write(sentinel_path, b"tick")?;
    assert!(sentinel.wait_for(expected, CALLBACK_TIMEOUT), "sentinel never fired");
    Ok(())
}

#[test]
fn writing_a_file_invokes_only_its_callback() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let a_path = dir.path().join("a.txt");
    let b_path = dir.path().join("b.txt");
    let sentinel_path = dir.path().join("sentinel");

    let watcher = FileWatcher::new()?;
    let a = Recorder::new();
    let b = Recorder::new();
    let sentinel = Recorder::new();

    let reg_a = watcher.register_file(&path_str(&a_path), a.callback())?;
    let reg_b = watcher.register_file(&path_str(&b_path), b.callback())?;
    watcher.register_file(&path_str(&sentinel_path), sentinel.callback())?;
    assert_eq!(reg_a.watch_id, reg_b.watch_id);
    assert_eq!(watcher.watched_directories(), 1);

    fs::write(&a_path, b"void main() {}")?;
    assert!(a.wait_for(1, CALLBACK_TIMEOUT), "callback for a.txt never fired");
    flush(&sentinel_path, &sentinel)?;

    assert!(a.calls().iter().all(|p| *p == path_str(&a_path)));
    assert_eq!(b.count(), 0);

    let a_before = a.count();
    fs::write(&b_path, b"precision mediump float;")?;
    assert!(b.wait_for(1, CALLBACK_TIMEOUT), "callback for b.txt never fired");
    flush(&sentinel_path, &sentinel)?;

    assert!(b.calls().iter().all(|p| *p == path_str(&b_path)));
    assert_eq!(a.count(), a_before);
    Ok(())
}

#[test]
fn same_name_in_two_directories_stays_separate() -> TestResult {
    init_tracing();
    let root = tempfile::tempdir()?;
    let one = root.path().join("one");
    let two = root.path().join("two");
    fs::create_dir(&one)?;
    fs::create_dir(&two)?;

    let watcher = FileWatcher::new()?;
    let rec_one = Recorder::new();
    let rec_two = Recorder::new();
    let sentinel = Recorder::new();
    let sentinel_path = two.join("sentinel");

    let reg_one = watcher.register_file(&path_str(&one.join("config.toml")), rec_one.callback())?;
    let reg_two = watcher.register_file(&path_str(&two.join("config.toml")), rec_two.callback())?;
    watcher.register_file(&path_str(&sentinel_path), sentinel.callback())?;
    assert_ne!(reg_one.watch_id, reg_two.watch_id);

    fs::write(one.join("config.toml"), b"answer = 42")?;
    assert!(rec_one.wait_for(1, CALLBACK_TIMEOUT));
    flush(&sentinel_path, &sentinel)?;

    assert_eq!(rec_two.count(), 0);
    Ok(())
}

#[test]
fn file_may_be_created_after_registration() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("later.glsl");

    let watcher = FileWatcher::new()?;
    let rec = Recorder::new();
    watcher.register_file(&path_str(&path), rec.callback())?;
    assert!(!path.exists());

    fs::write(&path, b"// new shader")?;
    assert!(rec.wait_for(1, CALLBACK_TIMEOUT));
    assert_eq!(rec.calls()[0], path_str(&path));
    Ok(())
}

#[test]
fn missing_parent_directory_is_reported() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing").join("a.txt");

    let watcher = FileWatcher::new()?;
    let err = watcher
        .register_file(&path_str(&path), |_: &str| {})
        .unwrap_err();

    assert!(matches!(err, FirewatchError::WatchFailed { .. }));
    assert!(err.to_string().contains("maybe the parent directory"));
    assert_eq!(watcher.watched_directories(), 0);
    Ok(())
}

#[test]
fn process_wide_watcher_is_created_once() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("global.toml");

    let first = firewatch::global()? as *const FileWatcher;
    let second = firewatch::global()? as *const FileWatcher;
    assert_eq!(first, second);

    let rec = Recorder::new();
    firewatch::register_file(&path_str(&path), rec.callback())?;
    fs::write(&path, b"reload = true")?;
    assert!(rec.wait_for(1, CALLBACK_TIMEOUT));
    Ok(())
}
