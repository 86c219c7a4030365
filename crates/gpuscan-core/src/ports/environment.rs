//! Environment variable ports.
//!
//! Reads go through [`EnvironmentPort`] instead of `std::env` so probes can
//! be exercised against a fabricated environment. System-scope writes are a
//! separate, async port because they shell out (`setx /M` on Windows).

use async_trait::async_trait;

use crate::domain::{CommandOutcome, CommandRequest};

/// Read-only view of the process environment.
pub trait EnvironmentPort: Send + Sync {
    /// Value of `name`, or `None` when unset or not valid Unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, treating an empty string as unset.
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.trim().is_empty())
    }
}

/// Persists environment variables at machine scope.
#[async_trait]
pub trait SystemEnvironmentWriter: Send + Sync {
    /// The command that [`set_system_var`](Self::set_system_var) will run, for reporting.
    fn describe(&self, name: &str, value: &str) -> CommandRequest;

    /// Set `name` to `value` for all users. An empty value clears it.
    async fn set_system_var(&self, name: &str, value: &str) -> CommandOutcome;
}
