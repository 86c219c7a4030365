//! Report rendering for `gpuscan uninstall`.

use std::fmt::Write as _;

use gpuscan_core::{
    ActionOutcome, InstalledComponentRecord, ProbeResult, SessionOutcome, SystemInfo,
    UninstallActionResult, UninstallStep,
};

use super::report::{NARROW_BANNER, banner, headline, render_probe, section_heading};
use super::style::Palette;
use super::system::{render_python_environment, render_system_info};

/// Menu shown before anything destructive happens.
pub const MENU: &str = "Choose an action:\n1. Uninstall all CUDA components\n2. Exit\n";
/// Prompt for the menu choice.
pub const MENU_PROMPT: &str = "Enter option (1-2): ";
/// Prompt for the typed confirmation.
pub const CONFIRM_PROMPT: &str = "WARNING: this removes every CUDA component listed above \
     and cannot be undone.\nType 'yes' to confirm: ";
/// Shown before an elevated window closes.
pub const EXIT_PROMPT: &str = "\nPress Enter to exit...";

/// Findings shown before the menu.
#[derive(Debug, Clone, Copy)]
pub struct UninstallFindings<'a> {
    pub system: &'a SystemInfo,
    /// Driver probe with a truncated banner.
    pub driver: &'a ProbeResult,
    pub toolkit: &'a ProbeResult,
    pub library: &'a ProbeResult,
    pub records: &'a [InstalledComponentRecord],
}

/// Everything printed before the menu: host, GPU details and found components.
pub fn render_uninstall_overview(palette: Palette, findings: &UninstallFindings<'_>) -> String {
    let mut out = String::new();
    out.push_str(&banner("CUDA uninstall tool", NARROW_BANNER));
    out.push('\n');

    let _ = writeln!(out, "{}", section_heading(palette, 1, "System information"));
    out.push_str(&render_system_info(findings.system));
    out.push_str(&render_python_environment(
        findings
            .library
            .library
            .as_ref()
            .and_then(|report| report.python.as_ref()),
    ));

    out.push('\n');
    let _ = writeln!(out, "{}", section_heading(palette, 2, "GPU and CUDA details"));
    out.push_str(&render_probe(palette, findings.driver));
    out.push_str(&render_probe(palette, findings.toolkit));
    let _ = writeln!(
        out,
        "{}",
        palette.status(findings.library.available, &headline(findings.library))
    );

    out.push('\n');
    let _ = writeln!(out, "{}", section_heading(palette, 3, "Installed CUDA components"));
    out.push_str(&render_records(findings.records));
    out
}

/// One line per finder record, in discovery order.
pub fn render_records(records: &[InstalledComponentRecord]) -> String {
    if records.is_empty() {
        return "  No CUDA components found\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        match &record.location {
            Some(location) => {
                let _ = writeln!(
                    out,
                    "  - {}: {} ({})",
                    record.source.label(),
                    record.identifier,
                    location.display()
                );
            }
            None => {
                let _ = writeln!(out, "  - {}: {}", record.source.label(), record.identifier);
            }
        }
    }
    out
}

/// Action log grouped by step, in execution order.
pub fn render_actions(palette: Palette, results: &[UninstallActionResult]) -> String {
    let mut out = String::new();
    for step in UninstallStep::ALL {
        let mut actions = results.iter().filter(|r| r.step == step).peekable();
        if actions.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "{}", palette.bold(step.label()));
        for action in actions {
            let _ = writeln!(out, "  {}", render_action(palette, action));
        }
    }
    out
}

fn render_action(palette: Palette, action: &UninstallActionResult) -> String {
    let description = &action.action_description;
    match &action.outcome {
        ActionOutcome::Skipped { reason } => {
            palette.warn(&format!("{description} (skipped: {reason})"))
        }
        outcome => match outcome.error() {
            Some(error) => palette.fail(&format!("{description}: {error}")),
            None if outcome.succeeded() => palette.ok(description),
            None => palette.fail(description),
        },
    }
}

/// Closing message for a finished session.
pub fn render_session_outcome(palette: Palette, outcome: &SessionOutcome) -> String {
    match outcome {
        SessionOutcome::NothingInstalled => {
            format!("{}\n", palette.ok("No CUDA components found; nothing to uninstall"))
        }
        SessionOutcome::Declined => {
            format!("{}\n", palette.warn("Uninstall cancelled; nothing was changed"))
        }
        SessionOutcome::Completed(results) => {
            let mut out = String::new();
            out.push('\n');
            out.push_str(&render_actions(palette, results));
            out.push('\n');
            out.push_str(&render_completion(palette, results));
            out
        }
    }
}

/// Verdict after the orchestrator ran.
///
/// Fatal failures are listed again because they need manual cleanup.
pub fn render_completion(palette: Palette, results: &[UninstallActionResult]) -> String {
    let mut out = String::new();
    let fatal: Vec<_> = results.iter().filter(|r| r.fatal).collect();
    if fatal.is_empty() {
        let _ = writeln!(out, "{}", palette.ok("CUDA uninstall complete"));
    } else {
        let _ = writeln!(
            out,
            "{}",
            palette.fail("Uninstall finished with errors; remove these manually:")
        );
        for action in fatal {
            let _ = writeln!(out, "  - {}", action.action_description);
        }
    }
    let _ = writeln!(out, "Restart the computer so the environment changes take effect.");
    out
}

/// Uninstall results that left residue behind.
pub fn has_fatal_failures(outcome: &SessionOutcome) -> bool {
    matches!(outcome, SessionOutcome::Completed(results) if results.iter().any(|r| r.fatal))
}
