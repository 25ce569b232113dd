// src/watch/callback.rs

use std::fmt;

/// Something to invoke when a watched file changes.
///
/// Implemented for every `Fn(&str) + Send + Sync` closure, so most callers
/// just pass a closure. Implement it by hand when the reaction needs its own
/// named type.
///
/// Callbacks run on the dispatch thread, one at a time. A slow callback
/// delays every other notification, so hand heavy work off to another
/// thread or channel.
pub trait FileCallback: Send + Sync {
    /// Called with the path exactly as it was registered.
    fn on_change(&self, path: &str);
}

impl<F> FileCallback for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_change(&self, path: &str) {
        self(path)
    }
}

impl fmt::Debug for dyn FileCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileCallback")
    }
}
