//! External command requests and their captured outcomes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single external command invocation.
///
/// Intent-based: callers say what to run and how long they are willing
/// to wait; the runner decides how to spawn it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Program name (resolved through `PATH`) or absolute path.
    pub program: String,
    /// Arguments passed verbatim, without shell interpretation.
    pub args: Vec<String>,
    /// Upper bound on the wait; `None` lets the runner apply its default.
    pub timeout: Option<Duration>,
}

impl CommandRequest {
    /// Create a request with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Bound the invocation by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of one external command.
///
/// Spawn failures and timeouts are folded into the same shape: the exit
/// code is [`CommandOutcome::SPAWN_FAILURE_CODE`] and `stderr` carries the
/// OS-level reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    /// Exit code reported when the process could not be spawned or was killed.
    pub const SPAWN_FAILURE_CODE: i32 = -1;

    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(0, stdout, "")
    }

    /// Process ran and exited with a nonzero code.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::new(exit_code, "", stderr)
    }

    /// Process never ran (missing executable, permission denied, timeout).
    pub fn spawn_failed(reason: impl fmt::Display) -> Self {
        Self::new(Self::SPAWN_FAILURE_CODE, "", reason.to_string())
    }

    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// First non-blank line of stdout, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout_lines().next()
    }

    /// Non-blank stdout lines, trimmed.
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Best description of why the command failed.
    ///
    /// Prefers stderr, then stdout (some tools report errors there), then the
    /// bare exit code.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exit code {}", self.exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeded_is_derived_from_exit_code() {
        assert!(CommandOutcome::success("ok").succeeded());
        assert!(!CommandOutcome::failure(2, "boom").succeeded());
        assert!(!CommandOutcome::spawn_failed("not found").succeeded());
        assert_eq!(
            CommandOutcome::spawn_failed("not found").exit_code,
            CommandOutcome::SPAWN_FAILURE_CODE
        );
    }

    #[test]
    fn first_line_skips_blank_lines() {
        let outcome = CommandOutcome::success("\n  Fri Oct 16 2026  \nsecond\n");
        assert_eq!(outcome.first_line(), Some("Fri Oct 16 2026"));
        assert_eq!(CommandOutcome::success("").first_line(), None);
    }

    #[test]
    fn failure_reason_falls_back_to_exit_code() {
        assert_eq!(CommandOutcome::failure(9, " denied \n").failure_reason(), "denied");
        assert_eq!(CommandOutcome::new(3, "NVML error", "").failure_reason(), "NVML error");
        assert_eq!(CommandOutcome::failure(4, "").failure_reason(), "exit code 4");
    }

    #[test]
    fn request_display_quotes_arguments_with_spaces() {
        let request = CommandRequest::new("wmic")
            .args(["product", "where", "name like '%CUDA%'"])
            .arg("");
        assert_eq!(
            request.to_string(),
            "wmic product where \"name like '%CUDA%'\" \"\""
        );
    }
}
