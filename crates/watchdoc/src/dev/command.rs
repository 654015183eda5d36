//! Rebuild command execution.
//!
//! The command runs through the platform shell with stdout and stderr
//! inherited from the server. Failures are logged and never propagated.

use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// How a command run ended.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Exited with status 0
    Succeeded,
    /// Exited with a non-zero status (or was killed by a signal)
    Failed(ExitStatus),
    /// The shell could not be started
    SpawnFailed(std::io::Error),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded)
    }
}

fn shell_command(command: &str) -> Command {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Run `command` to completion.
pub async fn run(command: &str) -> CommandOutcome {
    tracing::info!("Executing command: {}", command);

    let outcome = match shell_command(command).status().await {
        Ok(status) if status.success() => CommandOutcome::Succeeded,
        Ok(status) => CommandOutcome::Failed(status),
        Err(e) => CommandOutcome::SpawnFailed(e),
    };

    match &outcome {
        CommandOutcome::Succeeded => tracing::info!("Command execution completed"),
        CommandOutcome::Failed(status) => {
            tracing::warn!("Command execution failed: {}", status)
        }
        CommandOutcome::SpawnFailed(e) => {
            tracing::warn!("Command execution failed to start: {}", e)
        }
    }

    outcome
}
