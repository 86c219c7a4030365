//! The three read-only probes bundled behind shared ports.

use std::sync::Arc;

use serde::Serialize;

use super::{driver, library, toolkit};
use crate::config::InspectorConfig;
use crate::domain::ProbeResult;
use crate::ports::{
    CommandRunner, EnvironmentPort, FileSystemPort, LibraryLoader, LibraryProbeMode,
};

/// Runs driver, toolkit and library probes.
///
/// Probes share no mutable state and run sequentially; a negative finding
/// from one never stops the next.
#[derive(Clone)]
pub struct ProbeSet {
    runner: Arc<dyn CommandRunner>,
    env: Arc<dyn EnvironmentPort>,
    fs: Arc<dyn FileSystemPort>,
    loader: Arc<dyn LibraryLoader>,
    config: Arc<InspectorConfig>,
}

impl ProbeSet {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        env: Arc<dyn EnvironmentPort>,
        fs: Arc<dyn FileSystemPort>,
        loader: Arc<dyn LibraryLoader>,
        config: Arc<InspectorConfig>,
    ) -> Self {
        Self {
            runner,
            env,
            fs,
            loader,
            config,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub async fn driver(&self) -> ProbeResult {
        driver::probe_driver(self.runner.as_ref(), &self.config).await
    }

    /// Driver probe keeping up to `max_lines` lines of the tool's output.
    pub async fn driver_banner(&self, max_lines: usize) -> ProbeResult {
        driver::probe_driver_banner(self.runner.as_ref(), &self.config, max_lines).await
    }

    pub async fn toolkit(&self) -> ProbeResult {
        toolkit::probe_toolkit(
            self.runner.as_ref(),
            self.env.as_ref(),
            self.fs.as_ref(),
            &self.config,
        )
        .await
    }

    pub async fn library(&self, mode: LibraryProbeMode) -> ProbeResult {
        library::probe_library(self.loader.as_ref(), mode).await
    }

    /// Run all three probes in order.
    pub async fn inspect(&self, mode: LibraryProbeMode) -> InspectionSummary {
        let driver = self.driver().await;
        let toolkit = self.toolkit().await;
        let library = self.library(mode).await;
        InspectionSummary {
            driver,
            toolkit,
            library,
        }
    }
}

/// Findings of one full inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionSummary {
    pub driver: ProbeResult,
    pub toolkit: ProbeResult,
    pub library: ProbeResult,
}

impl InspectionSummary {
    pub const fn driver_available(&self) -> bool {
        self.driver.available
    }

    pub const fn toolkit_installed(&self) -> bool {
        self.toolkit.available
    }

    /// Library loaded and able to use the accelerator.
    pub const fn library_accelerated(&self) -> bool {
        self.library.available
    }

    /// Results in probe order.
    pub fn results(&self) -> [&ProbeResult; 3] {
        [&self.driver, &self.toolkit, &self.library]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::domain::{CommandOutcome, Component, LibraryReport};
    use crate::testing::{FakeCommandRunner, FakeEnvironment, FakeFileSystem, FakeLibraryLoader};

    fn probe_set(runner: FakeCommandRunner, loader: FakeLibraryLoader) -> ProbeSet {
        ProbeSet::new(
            Arc::new(runner),
            Arc::new(FakeEnvironment::new()),
            Arc::new(FakeFileSystem::new()),
            Arc::new(loader),
            Arc::new(InspectorConfig::for_platform(Platform::Unix)),
        )
    }

    #[tokio::test]
    async fn missing_driver_does_not_stop_other_probes() {
        let runner = FakeCommandRunner::new().with_response(
            "nvcc",
            CommandOutcome::success("Cuda compilation tools, release 12.4, V12.4.131"),
        );
        let loader = FakeLibraryLoader::with_report(LibraryReport {
            installed: true,
            cuda_available: true,
            ..LibraryReport::default()
        });

        let summary = probe_set(runner, loader).inspect(LibraryProbeMode::Basic).await;

        assert!(!summary.driver_available());
        assert!(summary.driver.error.is_some());
        assert!(summary.toolkit_installed());
        assert!(summary.library_accelerated());
        let components: Vec<_> = summary.results().iter().map(|r| r.component).collect();
        assert_eq!(
            components,
            vec![Component::Driver, Component::ToolkitRuntime, Component::Library]
        );
    }

    #[tokio::test]
    async fn empty_environment_yields_three_negative_findings() {
        let summary = probe_set(
            FakeCommandRunner::new(),
            FakeLibraryLoader::with_report(LibraryReport::default()),
        )
        .inspect(LibraryProbeMode::Basic)
        .await;

        assert!(summary.results().iter().all(|r| !r.available && r.error.is_some()));
    }
}
