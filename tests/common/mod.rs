#![allow(dead_code)]

pub use firewatch_test_utils::builders::{EventBatch, encode_event};
pub use firewatch_test_utils::fake_backend::{FakeBackend, FakeEvents};
pub use firewatch_test_utils::recorder::Recorder;
pub use firewatch_test_utils::{CALLBACK_TIMEOUT, init_tracing};

use firewatch::{FileWatcher, WatchOptions};

/// Directory every fake watcher has, holding the sentinel file.
pub const SENTINEL_DIR: &str = "/sentinel";

/// A watcher over a fake backend where `dirs` (and the sentinel directory)
/// exist.
pub struct FakeHarness {
    pub watcher: FileWatcher,
    pub backend: FakeBackend,
    pub events: FakeEvents,
    sentinel: Recorder,
    sentinel_wd: i32,
}

impl FakeHarness {
    pub fn new(dirs: &[&str]) -> Self {
        Self::with_options(dirs, WatchOptions::default())
    }

    pub fn with_options(dirs: &[&str], options: WatchOptions) -> Self {
        init_tracing();
        let (backend, events) = FakeBackend::with_dirs(dirs.iter().chain([&SENTINEL_DIR]));
        let watcher = FileWatcher::with_backend(backend.clone(), options);

        let sentinel = Recorder::new();
        let registration = watcher
            .register_file("/sentinel/flush", sentinel.callback())
            .expect("sentinel registration");

        Self {
            watcher,
            backend,
            events,
            sentinel,
            sentinel_wd: registration.watch_id.as_raw(),
        }
    }

    /// Deliver one batch of raw events.
    pub fn send(&self, batch: Vec<u8>) {
        self.events.send(batch);
    }

    /// Block until every batch sent so far has been dispatched.
    pub fn flush(&self) {
        let expected = self.sentinel.count() + 1;
        self.events.send(EventBatch::new().modify(self.sentinel_wd, "flush").build());
        assert!(
            self.sentinel.wait_for(expected, CALLBACK_TIMEOUT),
            "dispatch thread did not drain the event queue"
        );
    }
}
