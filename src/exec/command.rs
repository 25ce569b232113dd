// src/exec/command.rs

//! Runs the configured shell command for a changed file.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Environment variable carrying the changed path into the command.
pub const PATH_ENV_VAR: &str = "FIREWATCH_PATH";

/// How a command run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Non-zero exit code, or -1 when killed by a signal.
    Failed(i32),
}

/// Runs one watch's command at a time.
///
/// Changes that arrive while a run is in progress queue up behind it and
/// each gets its own run, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    turn: Arc<Mutex<()>>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a background run of `cmd` for `path` once earlier runs of this
    /// runner have finished.
    pub fn spawn(&self, name: String, cmd: String, path: String) -> JoinHandle<()> {
        let turn = Arc::clone(&self.turn);
        tokio::spawn(async move {
            let _turn = turn.lock().await;
            run_command(name, cmd, path).await;
        })
    }
}

/// Run `cmd` for a change to `path`, logging the outcome.
///
/// Errors (e.g. the shell could not be spawned) are logged rather than
/// returned so this can be handed straight to `tokio::spawn`.
pub async fn run_command(name: String, cmd: String, path: String) {
    match run_command_inner(&name, &cmd, &path).await {
        Ok(CommandOutcome::Success) => {
            info!(watch = %name, path = %path, "command finished");
        }
        Ok(CommandOutcome::Failed(code)) => {
            warn!(watch = %name, path = %path, code, "command failed");
        }
        Err(err) => {
            error!(watch = %name, path = %path, error = %err, "command execution error");
        }
    }
}

/// Spawn `cmd` through the shell and wait for it, forwarding its output
/// line by line with a `[name]` prefix.
pub async fn run_command_inner(name: &str, cmd: &str, path: &str) -> Result<CommandOutcome> {
    info!(watch = %name, path = %path, cmd = %cmd, "running command");

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .env(PATH_ENV_VAR, path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning command for watch '{}'", name))?;

    let stdout = child.stdout.take().map(|out| forward_lines(name.to_string(), out, false));
    let stderr = child.stderr.take().map(|err| forward_lines(name.to_string(), err, true));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for command of watch '{}'", name))?;

    // Drain the forwarders so all output is printed before the run counts as
    // finished.
    for handle in [stdout, stderr].into_iter().flatten() {
        let _ = handle.await;
    }

    if status.success() {
        Ok(CommandOutcome::Success)
    } else {
        Ok(CommandOutcome::Failed(status.code().unwrap_or(-1)))
    }
}

fn forward_lines<R>(name: String, reader: R, is_stderr: bool) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if is_stderr {
                eprintln!("[{name}] {line}");
            } else {
                println!("[{name}] {line}");
            }
        }
    })
}
