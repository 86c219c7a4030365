//! PyTorch bridge.
//!
//! The library is loaded by running an embedded Python script with the
//! configured interpreter. The script prints one line prefixed with
//! [`REPORT_MARKER`] followed by a JSON [`LibraryReport`]; anything else on
//! stdout (warnings printed by `import torch`, for instance) is ignored.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use gpuscan_core::ports::{CommandRunner, LibraryLoadError, LibraryLoader, LibraryProbeMode};
use gpuscan_core::{CommandOutcome, CommandRequest, LibraryReport};

/// Prefix of the line carrying the JSON report.
pub const REPORT_MARKER: &str = "GPUSCAN_REPORT:";

/// Python source run by [`PythonLibraryLoader`].
pub const PROBE_SCRIPT: &str = include_str!("torch_probe.py");

/// [`LibraryLoader`] that asks a Python interpreter about `torch`.
pub struct PythonLibraryLoader {
    runner: Arc<dyn CommandRunner>,
    interpreter: String,
    benchmark_size: u32,
    timeout: Duration,
}

impl PythonLibraryLoader {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        interpreter: impl Into<String>,
        benchmark_size: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            interpreter: interpreter.into(),
            benchmark_size,
            timeout,
        }
    }

    fn request(&self, mode: LibraryProbeMode) -> CommandRequest {
        CommandRequest::new(&self.interpreter)
            .args(["-c", PROBE_SCRIPT, mode.as_arg()])
            .arg(self.benchmark_size.to_string())
            .with_timeout(self.timeout)
    }
}

#[async_trait]
impl LibraryLoader for PythonLibraryLoader {
    fn library_name(&self) -> &str {
        "PyTorch"
    }

    async fn load(&self, mode: LibraryProbeMode) -> Result<LibraryReport, LibraryLoadError> {
        let outcome = self.runner.run(&self.request(mode)).await;
        debug!(
            interpreter = %self.interpreter,
            mode = mode.as_arg(),
            exit_code = outcome.exit_code,
            "library probe script finished"
        );
        parse_outcome(&outcome)
    }
}

/// Interpret the script's outcome.
///
/// A report line wins even when the exit code is nonzero, since the script
/// reports its own failures inside the document.
pub fn parse_outcome(outcome: &CommandOutcome) -> Result<LibraryReport, LibraryLoadError> {
    if let Some(json) = report_line(&outcome.stdout) {
        return serde_json::from_str(json)
            .map_err(|err| LibraryLoadError::MalformedOutput(err.to_string()));
    }

    if outcome.exit_code == CommandOutcome::SPAWN_FAILURE_CODE {
        return Err(LibraryLoadError::InterpreterUnavailable(outcome.failure_reason()));
    }
    if !outcome.succeeded() {
        return Err(LibraryLoadError::ScriptFailed(outcome.failure_reason()));
    }
    Err(LibraryLoadError::MalformedOutput(
        "probe script printed no report".to_string(),
    ))
}

fn report_line(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(REPORT_MARKER))
}
