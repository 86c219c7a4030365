//! Uninstall orchestration.
//!
//! Four steps always run in [`UninstallStep::ALL`] order, each independent
//! of the others. A step that has nothing to do still records a skipped
//! action, so the log shows every step. Completed actions are never rolled
//! back.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::path_filter::filter_path_entries;
use crate::config::InspectorConfig;
use crate::domain::{
    ActionOutcome, FileOpResult, InstalledComponentRecord, UninstallActionResult, UninstallStep,
};
use crate::ports::{EnvironmentPort, FileSystemPort, PackageRegistry, SystemEnvironmentWriter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("administrative privileges are required to uninstall")]
    ElevationRequired,
}

/// Runs the destructive uninstall steps against injected ports.
pub struct UninstallOrchestrator {
    registry: Arc<dyn PackageRegistry>,
    fs: Arc<dyn FileSystemPort>,
    env: Arc<dyn EnvironmentPort>,
    writer: Arc<dyn SystemEnvironmentWriter>,
    config: Arc<InspectorConfig>,
}

impl UninstallOrchestrator {
    pub fn new(
        registry: Arc<dyn PackageRegistry>,
        fs: Arc<dyn FileSystemPort>,
        env: Arc<dyn EnvironmentPort>,
        writer: Arc<dyn SystemEnvironmentWriter>,
        config: Arc<InspectorConfig>,
    ) -> Self {
        Self {
            registry,
            fs,
            env,
            writer,
            config,
        }
    }

    /// Remove the toolkit.
    ///
    /// `records` are what the finder reported; they are logged but the
    /// actions themselves target the configured roots, filters and
    /// variables only. Without elevation nothing runs.
    pub async fn uninstall(
        &self,
        records: &[InstalledComponentRecord],
        is_elevated: bool,
    ) -> Result<Vec<UninstallActionResult>, OrchestratorError> {
        if !is_elevated {
            warn!("uninstall refused: process is not elevated");
            return Err(OrchestratorError::ElevationRequired);
        }
        for record in records {
            info!(
                source = record.source.label(),
                identifier = %record.identifier,
                "uninstalling component"
            );
        }

        let mut results = Vec::new();
        for step in UninstallStep::ALL {
            let step_results = match step {
                UninstallStep::PackageRegistry => self.uninstall_packages().await,
                UninstallStep::InstallRoots => self.delete_install_roots(),
                UninstallStep::EnvironmentVariables => self.clear_env_vars().await,
                UninstallStep::SearchPath => vec![self.clean_search_path().await],
            };
            for result in &step_results {
                if !result.succeeded() {
                    warn!(
                        step = step.label(),
                        action = %result.action_description,
                        error = result.outcome.error().as_deref().unwrap_or(""),
                        "uninstall action failed"
                    );
                }
            }
            results.extend(step_results);
        }
        Ok(results)
    }

    async fn uninstall_packages(&self) -> Vec<UninstallActionResult> {
        let step = UninstallStep::PackageRegistry;
        let filters: Vec<&String> = self
            .config
            .vendor_package_filters
            .iter()
            .filter(|filter| !filter.is_empty())
            .collect();
        if filters.is_empty() {
            return vec![skipped(step, step.label(), "no package filters configured")];
        }

        let mut results = Vec::with_capacity(filters.len());
        for filter in filters {
            let description = self.registry.describe_uninstall(filter).to_string();
            let outcome = self.registry.uninstall(filter).await;
            results.push(UninstallActionResult::new(
                step,
                description,
                ActionOutcome::Command(outcome),
            ));
        }
        results
    }

    fn delete_install_roots(&self) -> Vec<UninstallActionResult> {
        let step = UninstallStep::InstallRoots;
        if self.config.install_roots.is_empty() {
            return vec![skipped(step, step.label(), "no install roots configured")];
        }

        self.config
            .install_roots
            .iter()
            .map(|root| {
                let description = format!("Delete {}", root.display());
                if self.fs.exists(root) {
                    UninstallActionResult::new(step, description, self.remove_root(root))
                        .fatal_on_failure()
                } else {
                    skipped(step, description, "directory not present")
                }
            })
            .collect()
    }

    fn remove_root(&self, root: &Path) -> ActionOutcome {
        let result = match self.fs.remove_dir_all(root) {
            Ok(()) => FileOpResult::removed(root.to_path_buf()),
            Err(err) => FileOpResult::failed(root.to_path_buf(), err.to_string()),
        };
        ActionOutcome::FileOp(result)
    }

    async fn clear_env_vars(&self) -> Vec<UninstallActionResult> {
        let step = UninstallStep::EnvironmentVariables;
        let mut results = Vec::new();
        for name in self.config.toolkit_env_vars() {
            let description = self.writer.describe(name, "").to_string();
            if self.env.non_empty_var(name).is_none() {
                results.push(skipped(step, description, format!("{name} not set")));
                continue;
            }
            let outcome = self.writer.set_system_var(name, "").await;
            results.push(UninstallActionResult::new(
                step,
                description,
                ActionOutcome::Command(outcome),
            ));
        }
        results
    }

    async fn clean_search_path(&self) -> UninstallActionResult {
        let step = UninstallStep::SearchPath;
        let var = self.config.search_path_var.as_str();
        let current = self.env.var(var).unwrap_or_default();
        let rewrite = filter_path_entries(
            &current,
            self.config.platform.path_separator(),
            &self.config.vendor_path_tokens,
        );

        if !rewrite.changed() {
            return skipped(step, format!("Rewrite {var}"), "no matching entries");
        }

        let description = format!(
            "Remove {} entr{} from {var}: {}",
            rewrite.removed.len(),
            if rewrite.removed.len() == 1 { "y" } else { "ies" },
            rewrite.removed.join(", ")
        );
        let value = rewrite.joined(self.config.platform.path_separator());
        let outcome = self.writer.set_system_var(var, &value).await;
        UninstallActionResult::new(step, description, ActionOutcome::Command(outcome))
            .fatal_on_failure()
    }
}

fn skipped(
    step: UninstallStep,
    description: impl Into<String>,
    reason: impl Into<String>,
) -> UninstallActionResult {
    UninstallActionResult::new(step, description, ActionOutcome::skipped(reason))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Platform;
    use crate::domain::CommandOutcome;
    use crate::testing::{
        FakeEnvironment, FakeFileSystem, FakePackageRegistry, FakeSystemEnvironmentWriter,
    };

    struct Harness {
        registry: Arc<FakePackageRegistry>,
        fs: Arc<FakeFileSystem>,
        writer: Arc<FakeSystemEnvironmentWriter>,
        orchestrator: UninstallOrchestrator,
    }

    fn harness(
        registry: FakePackageRegistry,
        fs: FakeFileSystem,
        env: FakeEnvironment,
        writer: FakeSystemEnvironmentWriter,
    ) -> Harness {
        let registry = Arc::new(registry);
        let fs = Arc::new(fs);
        let writer = Arc::new(writer);
        let orchestrator = UninstallOrchestrator::new(
            registry.clone(),
            fs.clone(),
            Arc::new(env),
            writer.clone(),
            Arc::new(InspectorConfig::for_platform(Platform::Windows)),
        );
        Harness {
            registry,
            fs,
            writer,
            orchestrator,
        }
    }

    fn roots() -> Vec<PathBuf> {
        InspectorConfig::for_platform(Platform::Windows).install_roots
    }

    #[tokio::test]
    async fn refuses_without_elevation() {
        let h = harness(
            FakePackageRegistry::new(),
            FakeFileSystem::new().with_dir(&roots()[0]),
            FakeEnvironment::new()
                .with_var("CUDA_PATH", r"C:\cuda")
                .with_var("PATH", r"C:\A;C:\cuda\bin"),
            FakeSystemEnvironmentWriter::new(),
        );

        let result = h.orchestrator.uninstall(&[], false).await;

        assert_eq!(result, Err(OrchestratorError::ElevationRequired));
        assert!(h.registry.uninstalled().is_empty());
        assert!(h.fs.removed().is_empty());
        assert!(h.writer.writes().is_empty());
    }

    #[tokio::test]
    async fn every_step_runs_when_packages_fail() {
        let h = harness(
            FakePackageRegistry::new()
                .with_uninstall_outcome(CommandOutcome::failure(1, "No Instance(s) Available.")),
            FakeFileSystem::new().with_dir(roots()[0].join("v12.1")),
            FakeEnvironment::new()
                .with_var("CUDA_PATH", r"C:\cuda")
                .with_var("PATH", r"C:\A;C:\NVIDIA\bin;C:\B"),
            FakeSystemEnvironmentWriter::new(),
        );

        let results = h.orchestrator.uninstall(&[], true).await.unwrap();
        let steps: Vec<_> = results.iter().map(|r| r.step).collect();

        assert_eq!(
            steps,
            vec![
                UninstallStep::PackageRegistry,
                UninstallStep::PackageRegistry,
                UninstallStep::InstallRoots,
                UninstallStep::InstallRoots,
                UninstallStep::EnvironmentVariables,
                UninstallStep::EnvironmentVariables,
                UninstallStep::SearchPath,
            ]
        );
        assert!(!results[0].succeeded());
        assert!(!results[0].fatal);
        assert_eq!(h.registry.uninstalled(), vec!["CUDA", "NVIDIA"]);
        assert_eq!(h.fs.removed(), vec![roots()[0].clone()]);
        assert_eq!(
            h.writer.writes(),
            vec![
                ("CUDA_PATH".to_string(), String::new()),
                ("PATH".to_string(), r"C:\A;C:\B".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn absent_targets_are_skipped() {
        let h = harness(
            FakePackageRegistry::new(),
            FakeFileSystem::new(),
            FakeEnvironment::new().with_var("PATH", r"C:\Windows;C:\Tools"),
            FakeSystemEnvironmentWriter::new(),
        );

        let results = h.orchestrator.uninstall(&[], true).await.unwrap();

        let skipped: Vec<_> = results
            .iter()
            .filter(|r| r.outcome.is_skipped())
            .map(|r| r.step)
            .collect();
        assert_eq!(
            skipped,
            vec![
                UninstallStep::InstallRoots,
                UninstallStep::InstallRoots,
                UninstallStep::EnvironmentVariables,
                UninstallStep::EnvironmentVariables,
                UninstallStep::SearchPath,
            ]
        );
        assert!(results.iter().all(UninstallActionResult::succeeded));
        assert!(h.writer.writes().is_empty());
    }

    #[tokio::test]
    async fn failed_directory_removal_is_fatal() {
        let h = harness(
            FakePackageRegistry::new(),
            FakeFileSystem::new()
                .with_dir(&roots()[1])
                .failing_removal(&roots()[1], "Access is denied. (os error 5)"),
            FakeEnvironment::new(),
            FakeSystemEnvironmentWriter::new(),
        );

        let results = h.orchestrator.uninstall(&[], true).await.unwrap();
        let deletion = results
            .iter()
            .find(|r| r.step == UninstallStep::InstallRoots && !r.outcome.is_skipped())
            .unwrap();

        assert!(!deletion.succeeded());
        assert!(deletion.fatal);
        assert!(deletion.outcome.error().unwrap().contains("Access is denied"));
    }

    #[tokio::test]
    async fn failed_path_write_is_fatal() {
        let h = harness(
            FakePackageRegistry::new(),
            FakeFileSystem::new(),
            FakeEnvironment::new().with_var("PATH", r"C:\A;C:\CUDA\bin"),
            FakeSystemEnvironmentWriter::new()
                .failing_var("PATH", "ERROR: Access to the registry path is denied."),
        );

        let results = h.orchestrator.uninstall(&[], true).await.unwrap();
        let path = results.last().unwrap();

        assert_eq!(path.step, UninstallStep::SearchPath);
        assert!(path.fatal);
        assert!(path.action_description.contains(r"C:\CUDA\bin"));
    }
}
