//! Tokio-backed [`CommandRunner`].

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use gpuscan_core::ports::CommandRunner;
use gpuscan_core::{CommandOutcome, CommandRequest, DEFAULT_PROBE_TIMEOUT};

/// Spawns real child processes and waits for them with a timeout.
///
/// The child is killed when the wait is abandoned (`kill_on_drop`), so a
/// hung tool never outlives the probe that started it. Stdin is closed so
/// tools that prompt fail fast instead of blocking.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    default_timeout: Duration,
}

impl TokioCommandRunner {
    pub const fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, request: &CommandRequest) -> CommandOutcome {
        let limit = request.timeout.unwrap_or(self.default_timeout);
        debug!(command = %request, timeout_secs = limit.as_secs(), "spawning command");

        let child = Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(err) => {
                debug!(program = %request.program, error = %err, "spawn failed");
                return CommandOutcome::spawn_failed(format!("{}: {err}", request.program));
            }
        };

        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let outcome = CommandOutcome::new(
                    output.status.code().unwrap_or(CommandOutcome::SPAWN_FAILURE_CODE),
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                );
                debug!(
                    program = %request.program,
                    exit_code = outcome.exit_code,
                    "command finished"
                );
                outcome
            }
            Ok(Err(err)) => CommandOutcome::spawn_failed(format!("{}: {err}", request.program)),
            Err(_) => {
                warn!(command = %request, timeout_secs = limit.as_secs(), "command timed out");
                CommandOutcome::spawn_failed(format!("timed out after {}s", limit.as_secs()))
            }
        }
    }
}
