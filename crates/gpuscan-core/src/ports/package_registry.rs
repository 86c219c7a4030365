//! Package registry port.
//!
//! The shipped implementation wraps `wmic product`, which is slow and
//! deprecated on recent Windows builds; keeping it behind this trait lets a
//! different query mechanism slot in without touching the finder or the
//! orchestrator.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CommandOutcome, CommandRequest};

/// Errors raised while querying the registry.
#[derive(Debug, Error)]
pub enum PackageRegistryError {
    /// The query command failed or could not be spawned.
    #[error("package query failed: {0}")]
    QueryFailed(String),
}

/// A package entry matched by a registry query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: Option<String>,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// `"<name> <version>"`, or just the name.
    pub fn display_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{} {version}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Platform package registry (installed programs list).
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Packages whose name contains `filter`, case-insensitively.
    async fn query(&self, filter: &str) -> Result<Vec<InstalledPackage>, PackageRegistryError>;

    /// The command [`uninstall`](Self::uninstall) runs for `filter`, for reporting.
    fn describe_uninstall(&self, filter: &str) -> CommandRequest;

    /// Uninstall every package matching `filter`.
    async fn uninstall(&self, filter: &str) -> CommandOutcome;
}
