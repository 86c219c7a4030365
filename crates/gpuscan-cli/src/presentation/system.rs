//! System information block shown at the top of every report.

use std::fmt::Write as _;

use gpuscan_core::{PythonEnvironment, SystemInfo};

/// Bytes per GiB, used for every memory figure in the reports.
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Format a byte count as `"12.00 GB"`.
#[allow(clippy::cast_precision_loss)]
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GIB)
}

/// Host facts, one `  - label: value` line each.
pub fn render_system_info(info: &SystemInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  - Detected at: {}",
        info.collected_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "  - Operating system: {} {}", info.os_name, info.os_version);
    if let Some(kernel) = &info.kernel_version {
        let _ = writeln!(out, "  - Kernel: {kernel}");
    }
    let _ = writeln!(out, "  - Architecture: {}", info.architecture);
    let _ = writeln!(out, "  - Memory: {}", format_gib(info.total_memory_bytes));
    out
}

/// Interpreter that hosted the library probe, with virtual-environment detection.
pub fn render_python_environment(python: Option<&PythonEnvironment>) -> String {
    let Some(python) = python else {
        return "  - Python: unknown (interpreter did not report)\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "  - Python version: {}", python.version);
    if !python.executable.is_empty() {
        let _ = writeln!(out, "  - Python executable: {}", python.executable);
    }
    if python.virtualenv {
        let _ = writeln!(out, "  - Virtual environment: {}", python.prefix);
    } else {
        let _ = writeln!(out, "  - System Python environment: {}", python.prefix);
    }
    out
}
