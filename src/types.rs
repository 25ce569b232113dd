use std::fmt;

/// Identifier of a directory watch, as assigned by the OS notification
/// facility (an inotify watch descriptor on Linux).
///
/// Identifiers are small integers. The kernel hands out the same identifier
/// again when a directory that is already watched is added a second time,
/// which is what lets many files share one directory watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(pub i32);

impl WatchId {
    /// Raw descriptor value.
    pub fn as_raw(self) -> i32 {
        self.0
    }

    /// Whether this identifier can refer to a real directory watch.
    ///
    /// The kernel uses `-1` for queue-level records such as overflow
    /// notifications; real watches are always positive.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wd{}", self.0)
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Directory watch the file was attached to.
    pub watch_id: WatchId,
    /// Position of the record inside that directory's registry.
    pub index: usize,
}
