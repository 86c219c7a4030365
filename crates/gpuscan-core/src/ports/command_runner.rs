//! Command runner port.
//!
//! Every external tool the inspector touches (`nvidia-smi`, `nvcc`, the
//! package registry, `setx`, the Python interpreter) is invoked through this
//! trait so tests can substitute canned outcomes.

use async_trait::async_trait;

use crate::domain::{CommandOutcome, CommandRequest};

/// Executes external commands and captures their output.
///
/// Implementations must never fail: a missing executable, a permission
/// error or a timeout is reported as an outcome with
/// [`CommandOutcome::SPAWN_FAILURE_CODE`] and the reason in `stderr`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion (or until its timeout) and capture output.
    async fn run(&self, request: &CommandRequest) -> CommandOutcome;
}
