use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use firewatch::FileCallback;

/// Callback that records every path it is invoked with, and lets the test
/// block until enough calls have arrived.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<(Mutex<Vec<String>>, Condvar)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback feeding this recorder.
    pub fn callback(&self) -> Recorder {
        self.clone()
    }

    /// Record one call by hand, e.g. from a callback that does more.
    pub fn record(&self, path: &str) {
        let (calls, cond) = &*self.inner;
        calls.lock().unwrap().push(path.to_string());
        cond.notify_all();
    }

    /// Every path recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.inner.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.inner.0.lock().unwrap().len()
    }

    /// Wait until at least `n` calls were recorded. Returns `false` on
    /// timeout.
    pub fn wait_for(&self, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (calls, cond) = &*self.inner;
        let mut guard = calls.lock().unwrap();
        while guard.len() < n {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = cond.wait_timeout(guard, deadline - now).unwrap().0;
        }
        true
    }
}

impl FileCallback for Recorder {
    fn on_change(&self, path: &str) {
        self.record(path);
    }
}
