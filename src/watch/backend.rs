// src/watch/backend.rs

//! Pluggable OS notification backend.
//!
//! The watcher talks to a `WatchBackend` instead of raw inotify calls. This
//! makes it easy to drive the registration and dispatch logic from a fake
//! backend in tests while production uses [`InotifyBackend`].

use std::fmt::Debug;
use std::io;
use std::path::Path;

use crate::types::WatchId;

pub use super::inotify::InotifyBackend;

/// Trait abstracting the OS file-change notification facility.
///
/// Implementations must allow `add_watch` to be called from any thread while
/// the dispatch thread is blocked inside `read_events`.
pub trait WatchBackend: Send + Sync + Debug {
    /// Watch `dir` for content modifications of its entries.
    ///
    /// Adding a directory that is already watched returns the existing id.
    fn add_watch(&self, dir: &Path) -> io::Result<WatchId>;

    /// Stop watching the directory behind `id`.
    fn remove_watch(&self, id: WatchId) -> io::Result<()>;

    /// Block until at least one event record is available, then fill `buf`
    /// with whole records and return the number of bytes written.
    ///
    /// An error of kind `Interrupted` is retried by the caller; any other
    /// error means the event source is gone.
    fn read_events(&self, buf: &mut [u8]) -> io::Result<usize>;
}
