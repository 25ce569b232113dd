// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::watch::{DEFAULT_EVENT_BUFFER_SIZE, DEFAULT_MAX_DIRECTORIES, WatchOptions};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// max_directories = 32
/// event_buffer_size = 32768
///
/// [watch.shader]
/// path = "assets/basic.frag"
/// cmd = "glslc assets/basic.frag -o assets/basic.spv"
/// ```
///
/// All sections are optional at the parsing stage; validation then requires
/// at least one `[watch.<name>]` entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All watched files from `[watch.<name>]`, keyed by entry name.
    #[serde(default)]
    pub watch: BTreeMap<String, WatchEntry>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub watch: BTreeMap<String, WatchEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, watch: BTreeMap<String, WatchEntry>) -> Self {
        Self { config, watch }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::from(&self.config)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// How many distinct directories may be watched at once.
    #[serde(default = "default_max_directories")]
    pub max_directories: usize,

    /// Size in bytes of the buffer change events are read into.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

fn default_max_directories() -> usize {
    DEFAULT_MAX_DIRECTORIES
}

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            max_directories: default_max_directories(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl From<&ConfigSection> for WatchOptions {
    fn from(section: &ConfigSection) -> Self {
        WatchOptions {
            max_directories: section.max_directories,
            event_buffer_size: section.event_buffer_size,
        }
    }
}

/// `[watch.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEntry {
    /// File to watch, relative to the working directory or absolute.
    pub path: String,

    /// Shell command to run when the file changes. Without one the changed
    /// path is printed to stdout.
    #[serde(default)]
    pub cmd: Option<String>,
}
