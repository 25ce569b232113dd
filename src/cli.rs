// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `firewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "firewatch",
    version,
    about = "Run commands or print paths when watched files are modified.",
    long_about = None
)]
pub struct CliArgs {
    /// Files to watch. When given, each changed path is printed to stdout
    /// and the config file is not read.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Firewatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FIREWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the watch list, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
