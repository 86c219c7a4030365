//! Host description shown at the top of every report.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Static facts about the machine running the inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name (e.g. "Windows", "Ubuntu").
    pub os_name: String,
    /// Long OS version string.
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub architecture: String,
    pub total_memory_bytes: u64,
    pub collected_at: DateTime<Local>,
}
