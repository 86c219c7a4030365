//! Administrative privilege detection and elevated relaunch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use gpuscan_core::ports::{CommandRunner, ElevationPort, ElevationStatus};
use gpuscan_core::{CommandRequest, Platform};

/// [`ElevationPort`] using the platform's own tools.
///
/// - Windows: `net session` succeeds only for administrators; relaunch goes
///   through `powershell Start-Process -Verb RunAs`, which shows the UAC
///   prompt.
/// - Elsewhere: `id -u` must print `0`; there is no relaunch, the user is
///   told to re-run with `sudo`.
pub struct OsElevation {
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
    executable: PathBuf,
    timeout: Duration,
}

impl OsElevation {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        platform: Platform,
        executable: PathBuf,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            platform,
            executable,
            timeout,
        }
    }

    /// The `powershell` invocation that relaunches `executable` elevated.
    pub fn relaunch_request(&self, args: &[String]) -> CommandRequest {
        let mut script = format!(
            "Start-Process -Verb RunAs -FilePath {}",
            ps_quote(&self.executable.to_string_lossy())
        );
        if !args.is_empty() {
            let list: Vec<String> = args.iter().map(|arg| ps_quote(arg)).collect();
            script.push_str(" -ArgumentList ");
            script.push_str(&list.join(","));
        }
        CommandRequest::new("powershell")
            .args(["-NoProfile", "-Command"])
            .arg(script)
            .with_timeout(self.timeout)
    }
}

#[async_trait]
impl ElevationPort for OsElevation {
    async fn is_elevated(&self) -> bool {
        let elevated = match self.platform {
            Platform::Windows => {
                let request = CommandRequest::new("net")
                    .arg("session")
                    .with_timeout(self.timeout);
                self.runner.run(&request).await.succeeded()
            }
            Platform::Unix => {
                let request = CommandRequest::new("id").arg("-u").with_timeout(self.timeout);
                let outcome = self.runner.run(&request).await;
                outcome.succeeded() && outcome.stdout.trim() == "0"
            }
        };
        debug!(elevated, "checked elevation");
        elevated
    }

    async fn relaunch_elevated(&self, args: &[String]) -> ElevationStatus {
        if self.platform != Platform::Windows {
            return ElevationStatus::RelaunchDenied(
                "automatic elevation is only available on Windows; re-run with sudo".to_string(),
            );
        }

        let outcome = self.runner.run(&self.relaunch_request(args)).await;
        if outcome.succeeded() {
            info!("relaunched with administrative privileges");
            ElevationStatus::RelaunchRequested
        } else {
            let reason = outcome.failure_reason();
            warn!(%reason, "elevated relaunch refused");
            ElevationStatus::RelaunchDenied(reason)
        }
    }
}

/// Single-quote a value for PowerShell, doubling embedded quotes.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpuscan_core::CommandOutcome;
    use gpuscan_core::testing::FakeCommandRunner;

    fn elevation(platform: Platform, runner: FakeCommandRunner) -> OsElevation {
        OsElevation::new(
            Arc::new(runner),
            platform,
            PathBuf::from(r"C:\Tools\gpuscan.exe"),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn windows_admin_check_uses_net_session() {
        let admin = elevation(
            Platform::Windows,
            FakeCommandRunner::new().with_response("net", CommandOutcome::success("")),
        );
        assert!(admin.is_elevated().await);

        let user = elevation(
            Platform::Windows,
            FakeCommandRunner::new()
                .with_response("net", CommandOutcome::failure(2, "System error 5 has occurred.")),
        );
        assert!(!user.is_elevated().await);
    }

    #[tokio::test]
    async fn unix_root_check() {
        let root = elevation(
            Platform::Unix,
            FakeCommandRunner::new().with_response("id", CommandOutcome::success("0\n")),
        );
        assert!(root.is_elevated().await);

        let user = elevation(
            Platform::Unix,
            FakeCommandRunner::new().with_response("id", CommandOutcome::success("1000\n")),
        );
        assert!(!user.is_elevated().await);
    }

    #[test]
    fn relaunch_quotes_arguments() {
        let elevation = elevation(Platform::Windows, FakeCommandRunner::new());
        let args = ["uninstall", "--python", r"C:\it's\python.exe", "--pause-on-exit"];
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();

        let request = elevation.relaunch_request(&args);

        assert_eq!(request.program, "powershell");
        assert_eq!(
            request.args[2],
            concat!(
                r"Start-Process -Verb RunAs -FilePath 'C:\Tools\gpuscan.exe' ",
                r"-ArgumentList 'uninstall','--python','C:\it''s\python.exe','--pause-on-exit'"
            )
        );
    }

    #[tokio::test]
    async fn declined_uac_prompt_is_denied() {
        let elevation = elevation(
            Platform::Windows,
            FakeCommandRunner::new().with_response(
                "powershell",
                CommandOutcome::failure(1, "The operation was canceled by the user."),
            ),
        );
        let status = elevation.relaunch_elevated(&["uninstall".to_string()]).await;
        assert_eq!(
            status,
            ElevationStatus::RelaunchDenied("The operation was canceled by the user.".to_string())
        );
    }

    #[tokio::test]
    async fn unix_never_relaunches() {
        let runner = FakeCommandRunner::new();
        let elevation = elevation(Platform::Unix, runner);
        let status = elevation.relaunch_elevated(&[]).await;
        assert!(matches!(status, ElevationStatus::RelaunchDenied(_)));
    }
}
