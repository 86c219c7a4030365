//! Driver probe: runs the GPU management tool and records its banner.

use tracing::debug;

use crate::config::InspectorConfig;
use crate::domain::{CommandRequest, Component, ProbeResult};
use crate::ports::CommandRunner;

/// Marker appended to a truncated banner.
pub const TRUNCATION_MARKER: &str = "...";

/// Probe the driver, keeping the first line of the tool's output.
///
/// The banner is not parsed; `version` stays unset. A missing executable and
/// a failing run are the same negative finding, with `error` carrying the
/// OS-level reason.
pub async fn probe_driver(runner: &dyn CommandRunner, config: &InspectorConfig) -> ProbeResult {
    let request = CommandRequest::new(&config.driver_tool).with_timeout(config.probe_timeout);
    let outcome = runner.run(&request).await;

    if outcome.succeeded() {
        debug!(tool = %config.driver_tool, "driver tool succeeded");
        let result = ProbeResult::available(Component::Driver);
        match outcome.first_line() {
            Some(line) => result.with_detail(line),
            None => result,
        }
    } else {
        debug!(tool = %config.driver_tool, exit_code = outcome.exit_code, "driver tool failed");
        ProbeResult::unavailable(Component::Driver, outcome.failure_reason())
    }
}

/// Probe the driver, keeping up to `max_lines` non-blank lines of output.
///
/// Lines keep their leading whitespace so the tool's table layout survives.
/// When output was cut, the last detail is [`TRUNCATION_MARKER`].
pub async fn probe_driver_banner(
    runner: &dyn CommandRunner,
    config: &InspectorConfig,
    max_lines: usize,
) -> ProbeResult {
    let request = CommandRequest::new(&config.driver_tool).with_timeout(config.probe_timeout);
    let outcome = runner.run(&request).await;

    if !outcome.succeeded() {
        return ProbeResult::unavailable(Component::Driver, outcome.failure_reason());
    }

    let lines: Vec<&str> = outcome
        .stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let truncated = lines.len() > max_lines;

    let result = ProbeResult::available(Component::Driver)
        .with_details(lines.into_iter().take(max_lines));
    if truncated {
        result.with_detail(TRUNCATION_MARKER)
    } else {
        result
    }
}
