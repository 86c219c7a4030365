//! Report rendering for `gpuscan check`.
//!
//! Every function here is pure: it takes findings and returns text. The
//! handlers decide where the text goes.

use std::fmt::Write as _;

use gpuscan_core::services::TRANSFER_DETAIL;
use gpuscan_core::{Component, InspectionSummary, ProbeResult, SystemInfo};

use super::style::Palette;
use super::system::{render_python_environment, render_system_info};

/// Banner width used by the check and uninstall reports.
pub const NARROW_BANNER: usize = 50;
/// Banner width used by the library report.
pub const WIDE_BANNER: usize = 60;

/// `=` rule, title, `=` rule.
pub fn banner(title: &str, width: usize) -> String {
    let rule = "=".repeat(width);
    format!("{rule}\n{title}\n{rule}\n")
}

/// Numbered section heading, e.g. `[2] NVIDIA GPU`.
pub fn section_heading(palette: Palette, index: usize, title: &str) -> String {
    palette.bold(&format!("[{index}] {title}"))
}

/// One-line verdict for a probe result.
pub fn headline(result: &ProbeResult) -> String {
    let label = result.component.label();
    if result.available {
        match (&result.version, result.component) {
            (Some(version), Component::ToolkitRuntime) => {
                format!("{label} installed, version {version}")
            }
            _ => format!("{label} available"),
        }
    } else {
        match &result.error {
            Some(error) => format!("{label} not available: {error}"),
            None => format!("{label} not available"),
        }
    }
}

/// Verdict plus indented details.
///
/// The device transfer check is a separate fact from the capability flag,
/// so its detail line gets its own marker.
pub fn render_probe(palette: Palette, result: &ProbeResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.status(result.available, &headline(result)));
    for detail in &result.details {
        if detail.starts_with(TRANSFER_DETAIL) {
            let ok = result
                .library
                .as_ref()
                .and_then(|report| report.transfer_succeeded())
                .unwrap_or(false);
            let _ = writeln!(out, "  {}", palette.status(ok, detail));
        } else {
            let _ = writeln!(out, "  - {detail}");
        }
    }
    out
}

/// Final summary aggregating the three probes.
pub fn render_summary(palette: Palette, summary: &InspectionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(NARROW_BANNER));
    let _ = writeln!(out, "{}", palette.bold("Summary:"));
    for result in summary.results() {
        let verdict = if result.available {
            palette.ok("available")
        } else {
            palette.fail("not available")
        };
        let _ = writeln!(out, "  {}: {verdict}", result.component.label());
    }
    let _ = writeln!(out, "{}", "=".repeat(NARROW_BANNER));
    out
}

/// Full `check` report: system information, the three probes and the summary.
pub fn render_check_report(
    palette: Palette,
    system: &SystemInfo,
    summary: &InspectionSummary,
) -> String {
    let mut out = String::new();
    out.push_str(&banner(
        "GPU check: NVIDIA driver, CUDA toolkit and PyTorch",
        NARROW_BANNER,
    ));
    out.push('\n');

    let _ = writeln!(out, "{}", section_heading(palette, 1, "System information"));
    out.push_str(&render_system_info(system));
    let python = summary
        .library
        .library
        .as_ref()
        .and_then(|report| report.python.as_ref());
    out.push_str(&render_python_environment(python));

    let sections = [
        (2, "NVIDIA GPU", &summary.driver),
        (3, "CUDA toolkit", &summary.toolkit),
        (4, "PyTorch CUDA support", &summary.library),
    ];
    for (index, title, result) in sections {
        out.push('\n');
        let _ = writeln!(out, "{}", section_heading(palette, index, title));
        out.push_str(&render_probe(palette, result));
    }

    out.push('\n');
    out.push_str(&render_summary(palette, summary));
    out
}
