//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Command runner, environment and filesystem adapters (via gpuscan-runtime)
//! - Package registry, `setx` writer and elevation adapters (via gpuscan-runtime)
//! - The Python library bridge (via gpuscan-runtime)
//!
//! Command handlers receive a [`CliContext`] and build core services from it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gpuscan_core::{
    CommandRunner, ComponentFinder, ElevationPort, EnvironmentPort, FileSystemPort,
    InspectorConfig, LibraryLoader, PackageRegistry, ProbeSet, SystemEnvironmentWriter,
    SystemInfo, UninstallOrchestrator,
};
use gpuscan_runtime::{
    OsElevation, OsEnvironment, OsFileSystem, PythonLibraryLoader, SetxWriter, TokioCommandRunner,
    WmicPackageRegistry, collect_system_info,
};
use tracing::debug;

use crate::parser::Cli;
use crate::presentation::Palette;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Inspector settings after flag and environment overrides.
    pub inspector: InspectorConfig,
    pub palette: Palette,
}

impl CliConfig {
    /// Layer `--timeout`, `--python` and colour flags over the defaults.
    ///
    /// clap has already folded `GPUSCAN_TIMEOUT_SECS` and `GPUSCAN_PYTHON`
    /// into the flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut inspector = InspectorConfig::default();
        if let Some(secs) = cli.timeout {
            inspector = inspector.with_probe_timeout(Duration::from_secs(secs));
        }
        let interpreter = resolve_interpreter(cli.python.as_deref(), &inspector.python_interpreter);
        inspector = inspector.with_python_interpreter(interpreter);

        let no_color_env = std::env::var("NO_COLOR").ok();
        Self {
            inspector,
            palette: Palette::from_flags(cli.no_color, no_color_env.as_deref()),
        }
    }
}

/// Pick the Python interpreter.
///
/// An explicit choice is used verbatim. Otherwise the platform default is
/// looked up on `PATH`, then plain `python`; when neither resolves the
/// default name is kept so the library probe reports it as missing.
pub fn resolve_interpreter(explicit: Option<&str>, default: &str) -> String {
    resolve_interpreter_with(explicit, default, |candidate| which::which(candidate).ok())
}

fn resolve_interpreter_with(
    explicit: Option<&str>,
    default: &str,
    lookup: impl Fn(&str) -> Option<PathBuf>,
) -> String {
    if let Some(explicit) = explicit {
        return explicit.to_string();
    }
    [default, "python"]
        .into_iter()
        .find_map(lookup)
        .map_or_else(
            || default.to_string(),
            |path| path.to_string_lossy().into_owned(),
        )
}

/// Fully composed context for CLI commands.
///
/// Owns every adapter behind its port so handlers can be exercised with
/// the fakes from `gpuscan_core::testing`.
pub struct CliContext {
    pub config: Arc<InspectorConfig>,
    pub palette: Palette,
    pub runner: Arc<dyn CommandRunner>,
    pub env: Arc<dyn EnvironmentPort>,
    pub fs: Arc<dyn FileSystemPort>,
    pub loader: Arc<dyn LibraryLoader>,
    pub registry: Arc<dyn PackageRegistry>,
    pub writer: Arc<dyn SystemEnvironmentWriter>,
    pub elevation: Arc<dyn ElevationPort>,
    /// Host description collected once at startup.
    pub system: SystemInfo,
}

impl CliContext {
    /// Driver, toolkit and library probes over this context's adapters.
    pub fn probe_set(&self) -> ProbeSet {
        ProbeSet::new(
            Arc::clone(&self.runner),
            Arc::clone(&self.env),
            Arc::clone(&self.fs),
            Arc::clone(&self.loader),
            Arc::clone(&self.config),
        )
    }

    pub fn finder(&self) -> ComponentFinder {
        ComponentFinder::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.fs),
            Arc::clone(&self.env),
            Arc::clone(&self.config),
        )
    }

    pub fn orchestrator(&self) -> UninstallOrchestrator {
        UninstallOrchestrator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.fs),
            Arc::clone(&self.env),
            Arc::clone(&self.writer),
            Arc::clone(&self.config),
        )
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Creates the tokio command runner shared by every adapter
/// 2. Wraps it in the registry, `setx`, elevation and library adapters
/// 3. Collects the host description
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let inspector = Arc::new(config.inspector);
    debug!(
        platform = inspector.platform.label(),
        python = %inspector.python_interpreter,
        timeout_secs = inspector.probe_timeout.as_secs(),
        "bootstrapping"
    );

    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new(inspector.probe_timeout));
    let executable: PathBuf =
        std::env::current_exe().context("Failed to locate the gpuscan executable")?;

    let loader = PythonLibraryLoader::new(
        Arc::clone(&runner),
        inspector.python_interpreter.clone(),
        inspector.benchmark_size,
        inspector.probe_timeout,
    );
    let registry = WmicPackageRegistry::new(
        Arc::clone(&runner),
        inspector.probe_timeout,
        inspector.uninstall_timeout,
    );
    let writer = SetxWriter::new(Arc::clone(&runner), inspector.probe_timeout);
    let elevation = OsElevation::new(
        Arc::clone(&runner),
        inspector.platform,
        executable,
        inspector.probe_timeout,
    );

    Ok(CliContext {
        palette: config.palette,
        runner,
        env: Arc::new(OsEnvironment),
        fs: Arc::new(OsFileSystem),
        loader: Arc::new(loader),
        registry: Arc::new(registry),
        writer: Arc::new(writer),
        elevation: Arc::new(elevation),
        system: collect_system_info(),
        config: inspector,
    })
}
