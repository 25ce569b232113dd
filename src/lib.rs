// src/lib.rs

//! Per-file change notification for hot reload.
//!
//! Register a file with a callback and the callback runs, on a background
//! thread, every time the file's content is modified:
//!
//! ```no_run
//! let watcher = firewatch::FileWatcher::new()?;
//! watcher.register_file("assets/basic.frag", |path: &str| {
//!     println!("reloading {path}");
//! })?;
//! # Ok::<(), firewatch::errors::FirewatchError>(())
//! ```
//!
//! Files are grouped into one OS watch per parent directory. See
//! [`FileWatcher`] for the threading and callback contract.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

pub use errors::{FirewatchError, Result};
pub use types::{Registration, WatchId};
pub use watch::{FileCallback, FileWatcher, WatchBackend, WatchOptions};
pub use watch::{global, register_file};

use anyhow::bail;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::exec::{ChangeAction, ChangeEvent, CommandRunner, WatchTarget};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (or the paths given on the command line)
/// - the file watcher and one registration per target
/// - command execution / path printing for each change
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let (targets, options) = if args.paths.is_empty() {
        let cfg = load_and_validate(&args.config)?;
        (WatchTarget::from_config(&cfg), cfg.watch_options())
    } else {
        (WatchTarget::from_paths(&args.paths), WatchOptions::default())
    };

    if args.dry_run {
        print_dry_run(&targets, &options);
        return Ok(());
    }

    let watcher = FileWatcher::with_options(options)?;

    // Callbacks run on the dispatch thread; they only hand the change over
    // to the async side.
    let (change_tx, mut change_rx) = mpsc::unbounded_channel::<ChangeEvent>();
    let registered = register_targets(&watcher, &targets, &change_tx);
    drop(change_tx);

    if registered == 0 {
        bail!("none of the {} watched files could be registered", targets.len());
    }
    info!(
        files = registered,
        directories = watcher.watched_directories(),
        "watching for changes"
    );

    // One runner per target, so a target's command never overlaps itself.
    let runners: Vec<CommandRunner> = targets.iter().map(|_| CommandRunner::new()).collect();

    loop {
        tokio::select! {
            maybe = change_rx.recv() => {
                let Some(change) = maybe else {
                    debug!("change channel closed");
                    break;
                };
                handle_change(&targets, &runners, change);
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("interrupted; shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Register every target, returning how many succeeded. Failures are logged
/// and skipped.
fn register_targets(
    watcher: &FileWatcher,
    targets: &[WatchTarget],
    change_tx: &mpsc::UnboundedSender<ChangeEvent>,
) -> usize {
    let mut registered = 0;

    for (index, target) in targets.iter().enumerate() {
        let tx = change_tx.clone();
        let callback = move |path: &str| {
            let _ = tx.send(ChangeEvent {
                target: index,
                path: path.to_string(),
            });
        };

        match watcher.register_file(&target.path, callback) {
            Ok(registration) => {
                debug!(
                    watch = %target.name,
                    path = %target.path,
                    watch_id = %registration.watch_id,
                    "registered"
                );
                registered += 1;
            }
            Err(err) => {
                warn!(watch = %target.name, path = %target.path, error = %err, "skipping watch");
            }
        }
    }

    registered
}

fn handle_change(targets: &[WatchTarget], runners: &[CommandRunner], change: ChangeEvent) {
    let (Some(target), Some(runner)) = (targets.get(change.target), runners.get(change.target))
    else {
        return;
    };

    match &target.action {
        ChangeAction::Print => println!("{}", change.path),
        ChangeAction::Command(cmd) => {
            runner.spawn(target.name.clone(), cmd.clone(), change.path);
        }
    }
}

/// Simple dry-run output: print the watch list and limits.
fn print_dry_run(targets: &[WatchTarget], options: &WatchOptions) {
    println!("firewatch dry-run");
    println!("  config.max_directories = {}", options.max_directories);
    println!("  config.event_buffer_size = {}", options.event_buffer_size);
    println!();

    println!("watch ({}):", targets.len());
    for target in targets {
        println!("  - {}", target.name);
        println!("      path: {}", target.path);
        if let ChangeAction::Command(cmd) = &target.action {
            println!("      cmd: {cmd}");
        }
    }

    debug!("dry-run complete (nothing watched)");
}
