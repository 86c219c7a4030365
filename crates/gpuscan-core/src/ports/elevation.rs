//! Elevation port.
//!
//! The orchestrator only needs the boolean "is this process elevated".
//! The relaunch mechanism is an entry-point concern and lives here so the
//! CLI can drive it without knowing how it works.

use async_trait::async_trait;

/// Result of making sure the process has administrative privileges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElevationStatus {
    /// Already running elevated; continue.
    AlreadyElevated,
    /// An elevated copy was launched; this process should exit.
    RelaunchRequested,
    /// Elevation was refused or is not possible here.
    RelaunchDenied(String),
}

/// Administrative privilege checks and relaunch.
#[async_trait]
pub trait ElevationPort: Send + Sync {
    async fn is_elevated(&self) -> bool;

    /// Start an elevated copy of the current executable with `args`.
    async fn relaunch_elevated(&self, args: &[String]) -> ElevationStatus;
}

/// Check elevation once and relaunch when missing.
pub async fn ensure_elevated(port: &dyn ElevationPort, args: &[String]) -> ElevationStatus {
    if port.is_elevated().await {
        ElevationStatus::AlreadyElevated
    } else {
        port.relaunch_elevated(args).await
    }
}
