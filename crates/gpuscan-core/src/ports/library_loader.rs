//! Library loader port.
//!
//! Loading the numerical library happens out of process (an embedded
//! Python script in `gpuscan-runtime`). Core only sees the resulting
//! [`LibraryReport`] or a [`LibraryLoadError`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::LibraryReport;

/// How much the library probe should collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryProbeMode {
    /// Version, capability flag, devices and a transfer check.
    #[default]
    Basic,
    /// Basic plus build info, per-device memory and matrix benchmarks.
    Extended,
}

impl LibraryProbeMode {
    pub const fn as_arg(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

/// Failures of the loading mechanism itself, as opposed to findings.
#[derive(Debug, Clone, Error)]
pub enum LibraryLoadError {
    /// The host interpreter could not be started.
    #[error("interpreter unavailable: {0}")]
    InterpreterUnavailable(String),

    /// The probe script ran but did not produce a report.
    #[error("probe script failed: {0}")]
    ScriptFailed(String),

    /// The report could not be parsed.
    #[error("malformed probe output: {0}")]
    MalformedOutput(String),
}

/// Loads the numerical library and reports what it can see.
#[async_trait]
pub trait LibraryLoader: Send + Sync {
    /// Human-readable library name.
    fn library_name(&self) -> &str;

    async fn load(&self, mode: LibraryProbeMode) -> Result<LibraryReport, LibraryLoadError>;
}
