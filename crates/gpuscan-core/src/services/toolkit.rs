//! Toolkit probe.
//!
//! Locating the CUDA compiler differs by platform family and both
//! conventions are supported explicitly:
//!
//! - Windows: the installer records the toolkit home in `CUDA_PATH`; the
//!   compiler lives at `<home>\bin\nvcc.exe`.
//! - Elsewhere: `nvcc` is expected on `PATH` and invoked by bare name.

use std::path::PathBuf;

use tracing::debug;

use crate::config::{InspectorConfig, Platform};
use crate::domain::{CommandOutcome, CommandRequest, Component, ProbeResult};
use crate::ports::{CommandRunner, EnvironmentPort, FileSystemPort};

/// Error fragment used when the toolkit home variable is missing.
pub const VARIABLE_NOT_SET: &str = "variable not set";

/// Error fragment used when the compiler is absent from the toolkit home.
pub const COMPILER_NOT_FOUND: &str = "compiler not found at expected path";

/// Probe the toolkit using the convention of `config.platform`.
pub async fn probe_toolkit(
    runner: &dyn CommandRunner,
    env: &dyn EnvironmentPort,
    fs: &dyn FileSystemPort,
    config: &InspectorConfig,
) -> ProbeResult {
    match config.platform {
        Platform::Windows => probe_from_home(runner, env, fs, config).await,
        Platform::Unix => probe_on_path(runner, config).await,
    }
}

async fn probe_from_home(
    runner: &dyn CommandRunner,
    env: &dyn EnvironmentPort,
    fs: &dyn FileSystemPort,
    config: &InspectorConfig,
) -> ProbeResult {
    let var = &config.toolkit_home_var;
    let Some(home) = env.non_empty_var(var) else {
        return ProbeResult::unavailable(
            Component::ToolkitRuntime,
            format!("{var} {VARIABLE_NOT_SET}"),
        );
    };
    let home_detail = format!("{var} = {home}");

    let compiler = compiler_path(&home, config.platform);
    if !fs.is_file(&compiler) {
        return ProbeResult::unavailable(
            Component::ToolkitRuntime,
            format!("{COMPILER_NOT_FOUND}: {}", compiler.display()),
        )
        .with_detail(home_detail);
    }

    let request = CommandRequest::new(compiler.to_string_lossy())
        .arg(&config.compiler_version_flag)
        .with_timeout(config.probe_timeout);
    let outcome = runner.run(&request).await;
    debug!(compiler = %compiler.display(), exit_code = outcome.exit_code, "ran toolkit compiler");

    finding_from_compiler(&outcome, vec![home_detail])
}

async fn probe_on_path(runner: &dyn CommandRunner, config: &InspectorConfig) -> ProbeResult {
    let request = CommandRequest::new(&config.compiler_command)
        .arg(&config.compiler_version_flag)
        .with_timeout(config.probe_timeout);
    let outcome = runner.run(&request).await;
    debug!(
        compiler = %config.compiler_command,
        exit_code = outcome.exit_code,
        "ran toolkit compiler"
    );

    finding_from_compiler(&outcome, Vec::new())
}

fn finding_from_compiler(outcome: &CommandOutcome, leading: Vec<String>) -> ProbeResult {
    if outcome.succeeded() {
        ProbeResult::available(Component::ToolkitRuntime)
            .with_version(parse_release_version(&outcome.stdout))
            .with_details(leading)
            .with_details(outcome.stdout_lines())
    } else {
        ProbeResult::unavailable(Component::ToolkitRuntime, outcome.failure_reason())
            .with_details(leading)
    }
}

/// `<home>/bin/<compiler>` for the given platform.
pub fn compiler_path(home: &str, platform: Platform) -> PathBuf {
    PathBuf::from(home).join("bin").join(platform.compiler_binary())
}

/// Extract `12.0` from `"Cuda compilation tools, release 12.0, V12.0.140"`.
pub fn parse_release_version(output: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains("release"))?;
    let version = line.split("release").nth(1)?.split(',').next()?.trim();
    (!version.is_empty()).then(|| version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCommandRunner, FakeEnvironment, FakeFileSystem};

    const NVCC_OUTPUT: &str = "nvcc: NVIDIA (R) Cuda compiler driver\n\
Copyright (c) 2005-2023 NVIDIA Corporation\n\
Built on Tue_Aug_15_22:09:35_Pacific_Daylight_Time_2023\n\
Cuda compilation tools, release 12.2, V12.2.140\n\
Build cuda_12.2.r12.2/compiler.33191640_0\n";

    const HOME: &str = r"C:\Program Files\NVIDIA GPU Computing Toolkit\CUDA\v12.2";

    fn windows() -> InspectorConfig {
        InspectorConfig::for_platform(Platform::Windows)
    }

    #[test]
    fn parses_release_version() {
        assert_eq!(parse_release_version(NVCC_OUTPUT), Some("12.2".to_string()));
        assert_eq!(parse_release_version("nvcc: unknown"), None);
        assert_eq!(parse_release_version("release , V1"), None);
    }

    #[tokio::test]
    async fn windows_without_home_variable() {
        let runner = FakeCommandRunner::new();
        let result = probe_toolkit(
            &runner,
            &FakeEnvironment::new(),
            &FakeFileSystem::new(),
            &windows(),
        )
        .await;

        assert!(!result.available);
        assert!(result.error.unwrap().contains(VARIABLE_NOT_SET));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn windows_home_without_compiler() {
        let env = FakeEnvironment::new().with_var("CUDA_PATH", HOME);
        let fs = FakeFileSystem::new().with_dir(HOME);
        let runner = FakeCommandRunner::new();

        let result = probe_toolkit(&runner, &env, &fs, &windows()).await;

        assert!(!result.available);
        let error = result.error.unwrap();
        assert!(error.contains(COMPILER_NOT_FOUND));
        assert!(error.contains("nvcc.exe"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn windows_home_with_compiler() {
        let compiler = compiler_path(HOME, Platform::Windows);
        let env = FakeEnvironment::new().with_var("CUDA_PATH", HOME);
        let fs = FakeFileSystem::new().with_file(&compiler);
        let runner = FakeCommandRunner::new().with_response(
            compiler.to_string_lossy(),
            CommandOutcome::success(NVCC_OUTPUT),
        );

        let result = probe_toolkit(&runner, &env, &fs, &windows()).await;

        assert!(result.available);
        assert_eq!(result.version.as_deref(), Some("12.2"));
        assert_eq!(result.details[0], format!("CUDA_PATH = {HOME}"));
        assert!(result.details.iter().any(|d| d.contains("release 12.2")));
        assert_eq!(runner.calls()[0].args, vec!["--version"]);
    }

    #[tokio::test]
    async fn unix_uses_bare_compiler_name() {
        let runner =
            FakeCommandRunner::new().with_response("nvcc", CommandOutcome::success(NVCC_OUTPUT));
        let config = InspectorConfig::for_platform(Platform::Unix);

        let (env, fs) = (FakeEnvironment::new(), FakeFileSystem::new());
        let result = probe_toolkit(&runner, &env, &fs, &config).await;

        assert!(result.available);
        assert_eq!(runner.calls()[0].program, "nvcc");
    }

    #[tokio::test]
    async fn unix_missing_compiler() {
        let runner = FakeCommandRunner::new();
        let config = InspectorConfig::for_platform(Platform::Unix);

        let (env, fs) = (FakeEnvironment::new(), FakeFileSystem::new());
        let result = probe_toolkit(&runner, &env, &fs, &config).await;

        assert!(!result.available);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn unix_ignores_home_variable() {
        let env = FakeEnvironment::new().with_var("CUDA_PATH", "/usr/local/cuda");
        let runner = FakeCommandRunner::new()
            .with_response("nvcc", CommandOutcome::failure(127, "nvcc: command not found"));
        let config = InspectorConfig::for_platform(Platform::Unix);

        let result = probe_toolkit(&runner, &env, &FakeFileSystem::new(), &config).await;

        assert!(!result.available);
        assert_eq!(result.error.as_deref(), Some("nvcc: command not found"));
    }
}
