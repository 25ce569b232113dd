// src/watch/table.rs

use std::collections::HashMap;

use crate::errors::{FirewatchError, Result};
use crate::types::WatchId;
use crate::watch::registry::{Registry, WatchedFile};

/// Default for [`WatchTable`] capacity: how many distinct directories may be
/// watched at once.
pub const DEFAULT_MAX_DIRECTORIES: usize = 32;

/// Maps directory-watch identifiers to the registry of files under that
/// directory.
///
/// A registry exists for an id iff some file was registered under it. The
/// number of distinct ids is capped at `max_directories`; the cap is a soft
/// limit chosen at construction, not a property of the storage.
#[derive(Debug)]
pub struct WatchTable {
    registries: HashMap<WatchId, Registry>,
    max_directories: usize,
}

impl WatchTable {
    pub fn new(max_directories: usize) -> Self {
        Self {
            registries: HashMap::new(),
            max_directories,
        }
    }

    /// Append `file` to the registry for `id`, creating the registry on first
    /// use. Returns the index inside that registry.
    ///
    /// Fails without touching the table when `id` is new and the table
    /// already holds `max_directories` registries.
    pub fn append(&mut self, id: WatchId, file: WatchedFile) -> Result<usize> {
        if !self.registries.contains_key(&id) && self.registries.len() >= self.max_directories {
            return Err(FirewatchError::CapacityExceeded {
                max: self.max_directories,
            });
        }
        Ok(self.registries.entry(id).or_default().append(file))
    }

    pub fn get(&self, id: WatchId) -> Option<&Registry> {
        self.registries.get(&id)
    }

    pub fn contains(&self, id: WatchId) -> bool {
        self.registries.contains_key(&id)
    }

    /// Number of directories with at least one registered file.
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    pub fn max_directories(&self) -> usize {
        self.max_directories
    }
}

impl Default for WatchTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIRECTORIES)
    }
}
