#![allow(dead_code)]

use std::collections::BTreeMap;

use firewatch::config::{ConfigFile, ConfigSection, RawConfigFile, WatchEntry};
use firewatch::watch::event::{EVENT_HEADER_LEN, IN_MODIFY};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                watch: BTreeMap::new(),
            },
        }
    }

    pub fn with_watch(mut self, name: &str, path: &str, cmd: Option<&str>) -> Self {
        self.config.watch.insert(
            name.to_string(),
            WatchEntry {
                path: path.to_string(),
                cmd: cmd.map(str::to_string),
            },
        );
        self
    }

    pub fn max_directories(mut self, n: usize) -> Self {
        self.config.config.max_directories = n;
        self
    }

    pub fn event_buffer_size(mut self, n: usize) -> Self {
        self.config.config.event_buffer_size = n;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode one inotify record the way the kernel lays it out: native-endian
/// header, then the name NUL-padded to a multiple of the header size.
pub fn encode_event(wd: i32, mask: u32, name: &str) -> Vec<u8> {
    let padded = if name.is_empty() {
        0
    } else {
        (name.len() + 1).next_multiple_of(EVENT_HEADER_LEN)
    };

    let mut out = Vec::with_capacity(EVENT_HEADER_LEN + padded);
    out.extend_from_slice(&wd.to_ne_bytes());
    out.extend_from_slice(&mask.to_ne_bytes());
    out.extend_from_slice(&0u32.to_ne_bytes());
    out.extend_from_slice(&(padded as u32).to_ne_bytes());
    out.extend_from_slice(name.as_bytes());
    out.resize(EVENT_HEADER_LEN + padded, 0);
    out
}

/// Builder for a batch of raw event records.
#[derive(Debug, Default)]
pub struct EventBatch {
    bytes: Vec<u8>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `IN_MODIFY` for `name` under watch `wd`.
    pub fn modify(self, wd: i32, name: &str) -> Self {
        self.record(wd, IN_MODIFY, name)
    }

    pub fn record(mut self, wd: i32, mask: u32, name: &str) -> Self {
        self.bytes.extend(encode_event(wd, mask, name));
        self
    }

    /// Append arbitrary bytes, e.g. a deliberately truncated record.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
