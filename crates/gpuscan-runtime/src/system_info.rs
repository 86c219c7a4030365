//! Host description for report headers.

use chrono::Local;
use sysinfo::System;

use gpuscan_core::SystemInfo;

/// Collect OS, architecture and memory details of this machine.
pub fn collect_system_info() -> SystemInfo {
    let mut sys = System::new();
    sys.refresh_memory();

    SystemInfo {
        os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        os_version: System::long_os_version()
            .or_else(System::os_version)
            .unwrap_or_else(|| "unknown".to_string()),
        kernel_version: System::kernel_version(),
        architecture: std::env::consts::ARCH.to_string(),
        total_memory_bytes: sys.total_memory(),
        collected_at: Local::now(),
    }
}
