// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FirewatchError, Result};
use crate::watch::event::MIN_EVENT_BUFFER;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FirewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_entries(cfg)?;
    validate_global_config(cfg)?;
    validate_entries(cfg)?;
    Ok(())
}

fn ensure_has_entries(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.is_empty() {
        return Err(FirewatchError::ConfigError(
            "config must contain at least one [watch.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.max_directories == 0 {
        return Err(FirewatchError::ConfigError(
            "[config].max_directories must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.config.event_buffer_size < MIN_EVENT_BUFFER {
        return Err(FirewatchError::ConfigError(format!(
            "[config].event_buffer_size must be >= {} (got {})",
            MIN_EVENT_BUFFER, cfg.config.event_buffer_size
        )));
    }

    Ok(())
}

fn validate_entries(cfg: &RawConfigFile) -> Result<()> {
    for (name, entry) in cfg.watch.iter() {
        if entry.path.trim().is_empty() {
            return Err(FirewatchError::ConfigError(format!(
                "watch '{}' has an empty `path`",
                name
            )));
        }
        if entry.path.ends_with('/') {
            return Err(FirewatchError::ConfigError(format!(
                "watch '{}' path '{}' names a directory; only files can be watched",
                name, entry.path
            )));
        }
        if let Some(cmd) = &entry.cmd {
            if cmd.trim().is_empty() {
                return Err(FirewatchError::ConfigError(format!(
                    "watch '{}' has an empty `cmd`; omit it to print changed paths",
                    name
                )));
            }
        }
    }
    Ok(())
}
