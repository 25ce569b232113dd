// src/watch/dispatch.rs

//! The dispatch thread: reads raw events from the backend and runs the
//! callbacks of the files they name.

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace, warn};

use crate::watch::callback::FileCallback;
use crate::watch::event::{RawEvent, decode_events};
use crate::watch::watcher::Shared;

const THREAD_NAME: &str = "firewatch-dispatch";

/// Start the dispatch thread for `shared`.
pub(crate) fn spawn_dispatcher(shared: Arc<Shared>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || dispatch_loop(&shared))
}

fn dispatch_loop(shared: &Shared) {
    let mut buf = vec![0u8; shared.options.buffer_size()];
    info!(buffer = buf.len(), "dispatch thread started");

    loop {
        let len = match shared.backend.read_events(&mut buf) {
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(error = %e, "reading change events failed; dispatch thread exiting");
                return;
            }
        };

        let invoked = dispatch_batch(shared, &buf[..len]);
        trace!(bytes = len, invoked, "processed event batch");
    }
}

/// Decode one batch and run every matching callback. Returns how many
/// callbacks were invoked.
pub(crate) fn dispatch_batch(shared: &Shared, batch: &[u8]) -> usize {
    let mut invoked = 0;

    for decoded in decode_events(batch) {
        let event = match decoded {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "malformed event record; skipping rest of batch");
                break;
            }
        };

        if event.is_overflow() {
            warn!("kernel event queue overflowed; some changes were not reported");
            continue;
        }
        if !event.is_actionable() {
            continue;
        }

        invoked += dispatch_event(shared, &event);
    }

    invoked
}

fn dispatch_event(shared: &Shared, event: &RawEvent) -> usize {
    // Collect under the lock, call without it, so callbacks may register
    // more files.
    let targets: Vec<(String, Arc<dyn FileCallback>)> = {
        let table = shared.lock_table();
        let Some(registry) = table.get(event.watch_id) else {
            trace!(watch_id = %event.watch_id, "event for unknown watch");
            return 0;
        };
        registry
            .matching(&event.name)
            .map(|f| (f.path().to_string(), Arc::clone(f.callback())))
            .collect()
    };

    if targets.is_empty() {
        return 0;
    }

    debug!(
        watch_id = %event.watch_id,
        name = %event.name_lossy(),
        callbacks = targets.len(),
        "file changed"
    );

    for (path, callback) in &targets {
        if catch_unwind(AssertUnwindSafe(|| callback.on_change(path))).is_err() {
            error!(path = %path, "change callback panicked");
        }
    }

    targets.len()
}
