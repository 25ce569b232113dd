// src/watch/global.rs

//! Process-wide default watcher.

use std::sync::OnceLock;

use crate::errors::Result;
use crate::types::Registration;
use crate::watch::callback::FileCallback;
use crate::watch::watcher::FileWatcher;

static GLOBAL: OnceLock<FileWatcher> = OnceLock::new();

/// The process-wide watcher, created with default options on first use.
///
/// If two threads race on first use, both may open an inotify instance but
/// only one is kept; the other is closed before any file is registered on
/// it.
pub fn global() -> Result<&'static FileWatcher> {
    if let Some(watcher) = GLOBAL.get() {
        return Ok(watcher);
    }
    let watcher = FileWatcher::new()?;
    Ok(GLOBAL.get_or_init(|| watcher))
}

/// Register `filepath` on the process-wide watcher.
///
/// See [`FileWatcher::register_file`].
pub fn register_file(filepath: &str, callback: impl FileCallback + 'static) -> Result<Registration> {
    global()?.register_file(filepath, callback)
}
