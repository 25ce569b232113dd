// src/watch/watcher.rs

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use tracing::{debug, error};

use crate::errors::{FirewatchError, Result};
use crate::types::{Registration, WatchId};
use crate::watch::backend::WatchBackend;
use crate::watch::callback::FileCallback;
use crate::watch::dispatch::spawn_dispatcher;
use crate::watch::event::{EVENT_HEADER_LEN, MIN_EVENT_BUFFER};
use crate::watch::registry::{MAX_PATH_LEN, WatchedFile, directory_of, filename_offset};
use crate::watch::table::{DEFAULT_MAX_DIRECTORIES, WatchTable};

/// Default size of the buffer the dispatch thread reads events into: room
/// for 1024 records with 16-byte names.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 1024 * (EVENT_HEADER_LEN + 16);

/// Tunables for a [`FileWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// How many distinct directories may be watched at once.
    pub max_directories: usize,
    /// Size in bytes of the dispatch thread's read buffer. Values below
    /// [`MIN_EVENT_BUFFER`] are raised to it.
    pub event_buffer_size: usize,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            max_directories: DEFAULT_MAX_DIRECTORIES,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl WatchOptions {
    pub(crate) fn buffer_size(&self) -> usize {
        self.event_buffer_size.max(MIN_EVENT_BUFFER)
    }
}

/// State shared between registering threads and the dispatch thread.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) backend: Arc<dyn WatchBackend>,
    pub(crate) table: Mutex<WatchTable>,
    pub(crate) options: WatchOptions,
}

impl Shared {
    /// Lock the table. A callback panic never happens under this lock, so a
    /// poisoned mutex still holds a consistent table.
    pub(crate) fn lock_table(&self) -> MutexGuard<'_, WatchTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Registers files for change notification and runs their callbacks when
/// the files are modified.
///
/// Files are grouped by parent directory: the first file registered in a
/// directory creates one OS watch for it, later files in the same directory
/// reuse that watch. A single background thread, started on the first
/// registration, reads change events and invokes matching callbacks.
///
/// Callbacks run on that thread, one at a time, and are invoked without any
/// internal lock held, so they may register further files. There is no way
/// to unregister a file, and dropping the watcher does not stop the dispatch
/// thread: with the inotify backend it lives until the process exits.
pub struct FileWatcher {
    shared: Arc<Shared>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("options", &self.shared.options)
            .field("watched_directories", &self.watched_directories())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Watcher backed by a fresh inotify instance with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(WatchOptions::default())
    }

    pub fn with_options(options: WatchOptions) -> Result<Self> {
        let backend = crate::watch::backend::InotifyBackend::new()?;
        Ok(Self::with_backend(backend, options))
    }

    /// Watcher driven by an arbitrary backend.
    pub fn with_backend(backend: impl WatchBackend + 'static, options: WatchOptions) -> Self {
        let shared = Shared {
            backend: Arc::new(backend),
            table: Mutex::new(WatchTable::new(options.max_directories)),
            options,
        };
        Self {
            shared: Arc::new(shared),
            dispatcher: Mutex::new(None),
        }
    }

    pub fn options(&self) -> WatchOptions {
        self.shared.options
    }

    /// Register `filepath` so that `callback` runs with `filepath` every time
    /// the file's content is modified.
    ///
    /// The path is stored verbatim, relative or absolute. The file does not
    /// have to exist yet, but its parent directory does. Registering the same
    /// path twice adds a second callback; both run on every change.
    pub fn register_file(
        &self,
        filepath: &str,
        callback: impl FileCallback + 'static,
    ) -> Result<Registration> {
        self.register_shared(filepath, Arc::new(callback))
    }

    /// Like [`register_file`](Self::register_file) for a callback that is
    /// already shared.
    pub fn register_shared(
        &self,
        filepath: &str,
        callback: Arc<dyn FileCallback>,
    ) -> Result<Registration> {
        self.ensure_dispatcher()?;
        validate_path(filepath)?;

        let offset = filename_offset(filepath);
        let directory = directory_of(filepath, offset);

        let watch_id = match self.shared.backend.add_watch(Path::new(directory)) {
            Ok(id) => id,
            Err(source) => {
                error!(
                    path = %filepath,
                    directory = %directory,
                    error = %source,
                    "could not begin watching file changes; maybe the parent directory does not exist?"
                );
                return Err(FirewatchError::WatchFailed {
                    path: filepath.to_string(),
                    directory: directory.to_string(),
                    source,
                });
            }
        };

        let appended = self
            .shared
            .lock_table()
            .append(watch_id, WatchedFile::new(filepath, callback));

        match appended {
            Ok(index) => {
                debug!(path = %filepath, %watch_id, index, "registered file");
                Ok(Registration { watch_id, index })
            }
            Err(err) => {
                // Only a directory the table has never seen can be rejected,
                // so nothing else refers to this watch.
                error!(path = %filepath, %watch_id, error = %err, "registration rejected");
                self.release_watch(watch_id);
                Err(err)
            }
        }
    }

    /// Number of directories currently being watched.
    pub fn watched_directories(&self) -> usize {
        self.shared.lock_table().len()
    }

    /// Paths registered under `id`, in registration order.
    pub fn watched_files(&self, id: WatchId) -> Vec<String> {
        self.shared
            .lock_table()
            .get(id)
            .map(|registry| registry.iter().map(|f| f.path().to_string()).collect())
            .unwrap_or_default()
    }

    /// Whether the dispatch thread has been started.
    pub fn is_dispatching(&self) -> bool {
        self.dispatcher
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Start the dispatch thread unless it is already running. The lock makes
    /// concurrent first registrations start exactly one thread.
    fn ensure_dispatcher(&self) -> Result<()> {
        let mut guard = self
            .dispatcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_none() {
            *guard = Some(spawn_dispatcher(Arc::clone(&self.shared))?);
        }
        Ok(())
    }

    /// Undo a watch created for a registration that was then rejected.
    fn release_watch(&self, watch_id: WatchId) {
        if let Err(e) = self.shared.backend.remove_watch(watch_id) {
            debug!(%watch_id, error = %e, "failed to remove unused watch");
        }
    }
}

fn validate_path(filepath: &str) -> Result<()> {
    let reason = if filepath.is_empty() {
        "path is empty"
    } else if filepath.ends_with('/') {
        "path names a directory, not a file"
    } else if filepath.len() > MAX_PATH_LEN {
        "path is longer than 4096 bytes"
    } else if filepath.contains('\0') {
        "path contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(FirewatchError::InvalidPath {
        path: filepath.to_string(),
        reason,
    })
}
