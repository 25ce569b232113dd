use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use firewatch::WatchId;
use firewatch::watch::WatchBackend;
use tokio::sync::mpsc;

/// A fake notification backend that:
/// - only accepts watches on directories it was told exist
/// - hands out watch ids like the kernel does (one per distinct directory)
/// - delivers whatever event batches the test pushes through [`FakeEvents`].
///
/// Clones share state, so a test can keep one clone for inspection after
/// moving another into a `FileWatcher`.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
    events: Arc<Mutex<mpsc::UnboundedReceiver<Vec<u8>>>>,
}

#[derive(Debug, Default)]
struct FakeState {
    dirs: HashSet<PathBuf>,
    ids: HashMap<PathBuf, WatchId>,
    next_id: i32,
    removed: Vec<WatchId>,
}

/// Sending half of a [`FakeBackend`]. Dropping it makes the backend report
/// a closed event source, which ends the dispatch thread.
#[derive(Debug, Clone)]
pub struct FakeEvents {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl FakeEvents {
    /// Queue one batch of raw event bytes for the next `read_events`.
    pub fn send(&self, batch: Vec<u8>) {
        self.tx.send(batch).expect("fake backend dropped");
    }
}

impl FakeBackend {
    pub fn new() -> (Self, FakeEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Self {
            state: Arc::new(Mutex::new(FakeState {
                next_id: 1,
                ..FakeState::default()
            })),
            events: Arc::new(Mutex::new(rx)),
        };
        (backend, FakeEvents { tx })
    }

    /// Backend where each of `dirs` exists.
    pub fn with_dirs<I, P>(dirs: I) -> (Self, FakeEvents)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let (backend, events) = Self::new();
        for dir in dirs {
            backend.add_dir(dir);
        }
        (backend, events)
    }

    /// Make `dir` exist so that watches on it succeed.
    pub fn add_dir(&self, dir: impl AsRef<Path>) {
        self.state.lock().unwrap().dirs.insert(dir.as_ref().to_path_buf());
    }

    /// Id handed out for `dir`, if it was ever watched.
    pub fn watch_id_for(&self, dir: impl AsRef<Path>) -> Option<WatchId> {
        self.state.lock().unwrap().ids.get(dir.as_ref()).copied()
    }

    /// Watches removed through `remove_watch`, in order.
    pub fn removed_watches(&self) -> Vec<WatchId> {
        self.state.lock().unwrap().removed.clone()
    }
}

impl WatchBackend for FakeBackend {
    fn add_watch(&self, dir: &Path) -> io::Result<WatchId> {
        let mut state = self.state.lock().unwrap();
        if !state.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }
        if let Some(id) = state.ids.get(dir) {
            return Ok(*id);
        }
        let id = WatchId(state.next_id);
        state.next_id += 1;
        state.ids.insert(dir.to_path_buf(), id);
        Ok(id)
    }

    fn remove_watch(&self, id: WatchId) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ids.retain(|_, existing| *existing != id);
        state.removed.push(id);
        Ok(())
    }

    fn read_events(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut rx = self.events.lock().unwrap();
        match rx.blocking_recv() {
            Some(batch) => {
                // Oversized batches are cut short, like a read into a small
                // buffer would be.
                let len = batch.len().min(buf.len());
                buf[..len].copy_from_slice(&batch[..len]);
                Ok(len)
            }
            None => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }
}
