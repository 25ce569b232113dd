// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirewatchError {
    #[error(
        "could not begin watching file changes for {path} (directory {directory:?}): {source}; \
         maybe the parent directory of the file does not exist?"
    )]
    WatchFailed {
        path: String,
        directory: String,
        #[source]
        source: std::io::Error,
    },

    #[error("too many watched directories (limit is {max})")]
    CapacityExceeded { max: usize },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FirewatchError>;
