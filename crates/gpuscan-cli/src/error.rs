//! CLI-specific error types and exit-code mapping.

use gpuscan_core::{OrchestratorError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    General(String),

    /// Administrative privileges are required and could not be obtained.
    #[error("Administrator privileges required: {0}")]
    ElevationDenied(String),

    /// The command cannot run on this operating system.
    #[error("{0}")]
    UnsupportedPlatform(String),

    /// Reading user input or writing the report failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// - 1: General error
    /// - 64-78: sysexits.h categories
    ///
    /// Usage errors never reach here; clap exits with 2 itself.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::General(_) => 1,
            Self::UnsupportedPlatform(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,                  // EX_IOERR
            Self::ElevationDenied(_) => 77,     // EX_NOPERM
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Input(io_err) => Self::Io(io_err.to_string()),
            SessionError::Orchestrator(inner @ OrchestratorError::ElevationRequired) => {
                Self::ElevationDenied(inner.to_string())
            }
        }
    }
}

/// Exit code for an error returned from a handler.
///
/// Errors that are not a [`CliError`] map to the general failure code.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>()
        .map_or(1, CliError::exit_code)
}
