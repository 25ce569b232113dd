// src/watch/registry.rs

//! Per-directory collection of watched files.

use std::sync::Arc;

use crate::watch::callback::FileCallback;

/// Longest path accepted for registration, matching Linux `PATH_MAX`.
pub const MAX_PATH_LEN: usize = 4096;

const INITIAL_CAPACITY: usize = 4;

/// One registered file: its path as given by the caller, where the filename
/// starts inside that path, and the callback to run.
#[derive(Clone)]
pub struct WatchedFile {
    path: String,
    filename_offset: usize,
    callback: Arc<dyn FileCallback>,
}

impl WatchedFile {
    /// Build a record for `path`, splitting the filename off at the last `/`.
    pub fn new(path: impl Into<String>, callback: Arc<dyn FileCallback>) -> Self {
        let path = path.into();
        let filename_offset = filename_offset(&path);
        Self {
            path,
            filename_offset,
            callback,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn filename_offset(&self) -> usize {
        self.filename_offset
    }

    /// Bare filename compared against event names.
    pub fn filename(&self) -> &[u8] {
        &self.path.as_bytes()[self.filename_offset..]
    }

    pub fn callback(&self) -> &Arc<dyn FileCallback> {
        &self.callback
    }

    /// Byte-for-byte comparison with an event name; no normalization.
    pub fn matches(&self, name: &[u8]) -> bool {
        self.filename() == name
    }
}

impl std::fmt::Debug for WatchedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchedFile")
            .field("path", &self.path)
            .field("filename_offset", &self.filename_offset)
            .finish_non_exhaustive()
    }
}

/// Index just past the last `/` in `path`, or 0 when there is none.
pub fn filename_offset(path: &str) -> usize {
    path.rfind('/').map(|i| i + 1).unwrap_or(0)
}

/// Directory part of `path` for a given filename offset.
///
/// A bare filename lives in the current directory, so offset 0 maps to ".".
/// Otherwise the trailing separator is kept, which keeps "/" intact for files
/// directly under the root.
pub fn directory_of(path: &str, offset: usize) -> &str {
    if offset == 0 { "." } else { &path[..offset] }
}

/// Insertion-ordered list of the files registered under one directory watch.
///
/// Growth follows `Vec`: capacity doubles when full. If the allocator cannot
/// satisfy a growth request the process aborts. A registry that silently
/// dropped a watch would be worse than a crash.
#[derive(Debug)]
pub struct Registry {
    files: Vec<WatchedFile>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            files: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a record and return its index.
    pub fn append(&mut self, file: WatchedFile) -> usize {
        self.files.push(file);
        self.files.len() - 1
    }

    /// Record at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&WatchedFile> {
        self.files.get(index)
    }

    /// Drop every record and release the storage. Calling it again is a
    /// no-op.
    pub fn clear(&mut self) {
        self.files = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.files.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedFile> {
        self.files.iter()
    }

    /// Records whose filename equals `name`, in registration order.
    pub fn matching<'a>(&'a self, name: &'a [u8]) -> impl Iterator<Item = &'a WatchedFile> + 'a {
        self.files.iter().filter(move |f| f.matches(name))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Arc<dyn FileCallback> {
        Arc::new(|_: &str| {})
    }

    #[test]
    fn splits_filename_at_last_separator() {
        assert_eq!(filename_offset("/tmp/x/a.txt"), 7);
        assert_eq!(filename_offset("a.txt"), 0);
        assert_eq!(filename_offset("/a.txt"), 1);
        assert_eq!(filename_offset("shaders/"), 8);
    }

    #[test]
    fn directory_defaults_to_current_dir() {
        assert_eq!(directory_of("a.txt", 0), ".");
        assert_eq!(directory_of("/tmp/x/a.txt", 7), "/tmp/x/");
        assert_eq!(directory_of("/a.txt", 1), "/");
        assert_eq!(directory_of("../up/b.glsl", 6), "../up/");
    }

    #[test]
    fn record_keeps_path_verbatim() {
        let file = WatchedFile::new("./assets/../assets/Shader.frag", noop());
        assert_eq!(file.path(), "./assets/../assets/Shader.frag");
        assert_eq!(file.filename(), b"Shader.frag");
        assert!(file.matches(b"Shader.frag"));
        assert!(!file.matches(b"shader.frag"));
        assert!(!file.matches(b"Shader.frag~"));
    }

    #[test]
    fn append_returns_sequential_indices_and_grows() {
        let mut registry = Registry::new();
        assert_eq!(registry.capacity(), INITIAL_CAPACITY);

        for i in 0..9 {
            let idx = registry.append(WatchedFile::new(format!("dir/f{i}"), noop()));
            assert_eq!(idx, i);
        }

        assert_eq!(registry.len(), 9);
        assert!(registry.capacity() >= 9);
        assert_eq!(registry.get(4).map(|f| f.path()), Some("dir/f4"));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let mut registry = Registry::new();
        assert!(registry.get(0).is_none());
        registry.append(WatchedFile::new("a", noop()));
        assert!(registry.get(0).is_some());
        assert!(registry.get(1).is_none());
        assert!(registry.get(usize::MAX).is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut registry = Registry::new();
        registry.append(WatchedFile::new("a", noop()));
        registry.clear();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), 0);
    }

    #[test]
    fn matching_preserves_registration_order() {
        let mut registry = Registry::new();
        registry.append(WatchedFile::new("x/a.txt", noop()));
        registry.append(WatchedFile::new("x/b.txt", noop()));
        registry.append(WatchedFile::new("./x/a.txt", noop()));

        let paths: Vec<&str> = registry.matching(b"a.txt").map(|f| f.path()).collect();
        assert_eq!(paths, vec!["x/a.txt", "./x/a.txt"]);
    }
}
