//! Process environment reads and system-scope writes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use gpuscan_core::ports::{CommandRunner, EnvironmentPort, SystemEnvironmentWriter};
use gpuscan_core::{CommandOutcome, CommandRequest};

/// Longest value `setx` stores without truncating it.
pub const SETX_MAX_VALUE_LEN: usize = 1024;

/// Registry key holding machine-scope environment variables.
pub const SYSTEM_ENVIRONMENT_KEY: &str =
    r"HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

/// Reads variables from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironment;

impl EnvironmentPort for OsEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Writes machine-wide variables with `setx <name> <value> /M`.
///
/// `setx` silently truncates values longer than [`SETX_MAX_VALUE_LEN`], so
/// those are written with `reg add` straight into [`SYSTEM_ENVIRONMENT_KEY`]
/// instead. Either way only the registry changes; the running process and
/// its parent shell keep their old values.
pub struct SetxWriter {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl SetxWriter {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait]
impl SystemEnvironmentWriter for SetxWriter {
    fn describe(&self, name: &str, value: &str) -> CommandRequest {
        let request = if value.chars().count() > SETX_MAX_VALUE_LEN {
            // PATH keeps its %VAR% references unexpanded.
            let kind = if name.eq_ignore_ascii_case("PATH") {
                "REG_EXPAND_SZ"
            } else {
                "REG_SZ"
            };
            CommandRequest::new("reg").args([
                "add",
                SYSTEM_ENVIRONMENT_KEY,
                "/v",
                name,
                "/t",
                kind,
                "/d",
                value,
                "/f",
            ])
        } else {
            CommandRequest::new("setx").args([name, value, "/M"])
        };
        request.with_timeout(self.timeout)
    }

    async fn set_system_var(&self, name: &str, value: &str) -> CommandOutcome {
        let request = self.describe(name, value);
        debug!(
            var = name,
            len = value.len(),
            program = %request.program,
            "writing system variable"
        );
        let outcome = self.runner.run(&request).await;
        if outcome.succeeded() {
            info!(var = name, "system environment variable updated");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpuscan_core::testing::FakeCommandRunner;

    #[test]
    fn os_environment_reads_process_vars() {
        assert!(OsEnvironment.var("GPUSCAN_SURELY_UNSET_VARIABLE").is_none());
        assert!(OsEnvironment.var("PATH").is_some());
    }

    #[tokio::test]
    async fn clears_with_empty_value() {
        let saved = CommandOutcome::success("SUCCESS: Specified value was saved.");
        let runner = Arc::new(FakeCommandRunner::new().with_response("setx", saved));
        let writer = SetxWriter::new(runner.clone(), Duration::from_secs(5));

        let outcome = writer.set_system_var("CUDA_PATH", "").await;

        assert!(outcome.succeeded());
        let calls = runner.calls();
        assert_eq!(calls[0].args, vec!["CUDA_PATH", "", "/M"]);
        assert_eq!(calls[0].to_string(), "setx CUDA_PATH \"\" /M");
        assert_eq!(calls[0].timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn long_values_bypass_setx() {
        let saved = CommandOutcome::success("The operation completed successfully.");
        let runner = Arc::new(FakeCommandRunner::new().with_response("reg", saved));
        let writer = SetxWriter::new(runner.clone(), Duration::from_secs(5));
        let long_path = vec![r"C:\Program Files\Some Vendor\Tool\bin"; 40].join(";");
        assert!(long_path.len() > SETX_MAX_VALUE_LEN);

        let outcome = writer.set_system_var("PATH", &long_path).await;

        assert!(outcome.succeeded());
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "reg");
        assert_eq!(
            calls[0].args,
            vec![
                "add",
                SYSTEM_ENVIRONMENT_KEY,
                "/v",
                "PATH",
                "/t",
                "REG_EXPAND_SZ",
                "/d",
                long_path.as_str(),
                "/f",
            ]
        );
    }

    #[test]
    fn limit_is_inclusive_for_setx() {
        let writer = SetxWriter::new(Arc::new(FakeCommandRunner::new()), Duration::from_secs(5));
        let at_limit = "x".repeat(SETX_MAX_VALUE_LEN);

        assert_eq!(writer.describe("CUDA_HOME", &at_limit).program, "setx");
        let over = writer.describe("CUDA_HOME", &format!("{at_limit}x"));
        assert_eq!(over.program, "reg");
        assert!(over.args.contains(&"REG_SZ".to_string()));
    }
}
