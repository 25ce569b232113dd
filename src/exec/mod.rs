// src/exec/mod.rs

//! Reactions to file changes for the `firewatch` binary.
//!
//! The watcher's callbacks run on its dispatch thread and must stay short,
//! so they only push a [`ChangeEvent`] into a channel. The async side
//! receives those events and performs the configured [`ChangeAction`]:
//! printing the path, or running a shell command via [`command`].

pub mod command;

pub use command::{CommandOutcome, CommandRunner, run_command};

use crate::config::ConfigFile;

/// What to do when a watched file changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    /// Print the changed path to stdout.
    Print,
    /// Run this command through `sh -c`.
    Command(String),
}

/// One file to watch and what to do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub name: String,
    pub path: String,
    pub action: ChangeAction,
}

impl WatchTarget {
    /// Targets for the `[watch.<name>]` entries of a config file.
    pub fn from_config(cfg: &ConfigFile) -> Vec<WatchTarget> {
        cfg.watch
            .iter()
            .map(|(name, entry)| WatchTarget {
                name: name.clone(),
                path: entry.path.clone(),
                action: match &entry.cmd {
                    Some(cmd) => ChangeAction::Command(cmd.clone()),
                    None => ChangeAction::Print,
                },
            })
            .collect()
    }

    /// Print-only targets for paths given on the command line; each is named
    /// after its path.
    pub fn from_paths(paths: &[String]) -> Vec<WatchTarget> {
        paths
            .iter()
            .map(|path| WatchTarget {
                name: path.clone(),
                path: path.clone(),
                action: ChangeAction::Print,
            })
            .collect()
    }
}

/// A change reported by the watcher, tagged with the target it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub target: usize,
    pub path: String,
}
