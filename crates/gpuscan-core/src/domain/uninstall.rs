//! Installed-component records and uninstall action results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::command::CommandOutcome;

/// Detection method that produced an [`InstalledComponentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSource {
    PackageRegistry,
    FilesystemPath,
    EnvironmentVariable,
}

impl ComponentSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PackageRegistry => "installed package",
            Self::FilesystemPath => "install directory",
            Self::EnvironmentVariable => "environment variable",
        }
    }
}

/// One trace of an installed component.
///
/// The same installation can be reported by several sources; records are
/// never deduplicated across sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledComponentRecord {
    pub source: ComponentSource,
    /// Package name and version, version folder, or variable name.
    pub identifier: String,
    pub location: Option<PathBuf>,
}

impl InstalledComponentRecord {
    pub fn package(identifier: impl Into<String>) -> Self {
        Self {
            source: ComponentSource::PackageRegistry,
            identifier: identifier.into(),
            location: None,
        }
    }

    pub fn directory(version: impl Into<String>, location: PathBuf) -> Self {
        Self {
            source: ComponentSource::FilesystemPath,
            identifier: version.into(),
            location: Some(location),
        }
    }

    pub fn env_var(name: impl Into<String>, location: PathBuf) -> Self {
        Self {
            source: ComponentSource::EnvironmentVariable,
            identifier: name.into(),
            location: Some(location),
        }
    }
}

/// Outcome of a filesystem action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOpResult {
    pub path: PathBuf,
    pub succeeded: bool,
    pub error: Option<String>,
}

impl FileOpResult {
    pub const fn removed(path: PathBuf) -> Self {
        Self {
            path,
            succeeded: true,
            error: None,
        }
    }

    pub fn failed(path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            path,
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

/// What happened when an action ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    Command(CommandOutcome),
    FileOp(FileOpResult),
    /// Nothing to do (target absent, variable unset, no matching entry).
    Skipped { reason: String },
}

impl ActionOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Skipped actions count as successful.
    pub const fn succeeded(&self) -> bool {
        match self {
            Self::Command(outcome) => outcome.succeeded(),
            Self::FileOp(result) => result.succeeded,
            Self::Skipped { .. } => true,
        }
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Failure text, if the action failed.
    pub fn error(&self) -> Option<String> {
        match self {
            Self::Command(outcome) if !outcome.succeeded() => Some(outcome.failure_reason()),
            Self::FileOp(result) => result.error.clone(),
            _ => None,
        }
    }
}

/// The four fixed uninstall steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UninstallStep {
    PackageRegistry,
    InstallRoots,
    EnvironmentVariables,
    SearchPath,
}

impl UninstallStep {
    pub const ALL: [Self; 4] = [
        Self::PackageRegistry,
        Self::InstallRoots,
        Self::EnvironmentVariables,
        Self::SearchPath,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::PackageRegistry => "Uninstall registered packages",
            Self::InstallRoots => "Delete install directories",
            Self::EnvironmentVariables => "Clear environment variables",
            Self::SearchPath => "Clean PATH",
        }
    }
}

/// Record of one uninstall action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallActionResult {
    pub step: UninstallStep,
    pub action_description: String,
    pub outcome: ActionOutcome,
    /// The failure left residue that needs manual cleanup.
    pub fatal: bool,
}

impl UninstallActionResult {
    pub fn new(
        step: UninstallStep,
        description: impl Into<String>,
        outcome: ActionOutcome,
    ) -> Self {
        Self {
            step,
            action_description: description.into(),
            outcome,
            fatal: false,
        }
    }

    /// Mark a failed action as requiring manual cleanup.
    #[must_use]
    pub fn fatal_on_failure(mut self) -> Self {
        self.fatal = !self.outcome.succeeded();
        self
    }

    pub const fn succeeded(&self) -> bool {
        self.outcome.succeeded()
    }
}
