// src/watch/mod.rs

//! File watching and change dispatch.
//!
//! This module is responsible for:
//! - Grouping registered files by parent directory, one OS watch per
//!   directory (`registry`, `table`).
//! - Talking to the OS notification facility through a swappable backend
//!   (`backend`, `inotify`).
//! - Decoding raw event records (`event`) and running the callbacks of the
//!   files they name on a single background thread (`dispatch`).
//!
//! It does **not** know about config files or commands; it only turns
//! "this name changed in this directory" into "call this file's callback".

pub mod backend;
pub mod callback;
mod dispatch;
pub mod event;
pub mod global;
pub mod inotify;
pub mod registry;
pub mod table;
pub mod watcher;

pub use backend::{InotifyBackend, WatchBackend};
pub use callback::FileCallback;
pub use event::{DecodeError, RawEvent, decode_events};
pub use global::{global, register_file};
pub use registry::{Registry, WatchedFile};
pub use table::{DEFAULT_MAX_DIRECTORIES, WatchTable};
pub use watcher::{DEFAULT_EVENT_BUFFER_SIZE, FileWatcher, WatchOptions};
