//! Inspector configuration.
//!
//! Every tool name, environment variable, install root and timeout the
//! probes and the uninstaller touch lives here. Logic never embeds these
//! values directly; adapters and tests construct an [`InspectorConfig`]
//! and pass it down.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default timeout for read-only probe commands.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for package-registry uninstall commands.
///
/// `wmic product ... call uninstall` walks every MSI package on the machine.
pub const DEFAULT_UNINSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Side length of the square matrices used by the extended library benchmark.
pub const DEFAULT_BENCHMARK_SIZE: u32 = 1000;

/// Platform family, as far as toolchain conventions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Registry-style environment conventions (`CUDA_PATH`, `nvcc.exe`, `;` separator).
    Windows,
    /// Everything else: binaries are resolved through `PATH` by bare name.
    Unix,
}

impl Platform {
    /// Detect the platform this binary was built for.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Separator used by `PATH`-like variables.
    pub const fn path_separator(self) -> char {
        match self {
            Self::Windows => ';',
            Self::Unix => ':',
        }
    }

    /// File name of the CUDA compiler on this platform.
    pub const fn compiler_binary(self) -> &'static str {
        match self {
            Self::Windows => "nvcc.exe",
            Self::Unix => "nvcc",
        }
    }

    /// Default Python interpreter command.
    pub const fn python_command(self) -> &'static str {
        match self {
            Self::Windows => "python",
            Self::Unix => "python3",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Unix => "Unix",
        }
    }
}

/// Full configuration for probes, the finder and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    /// Platform whose conventions the toolkit probe follows.
    pub platform: Platform,
    /// GPU management tool invoked by the driver probe.
    pub driver_tool: String,
    /// Compiler invoked by the toolkit probe on non-Windows platforms.
    pub compiler_command: String,
    /// Flag passed to the compiler to print its version banner.
    pub compiler_version_flag: String,
    /// Environment variable holding the toolkit home directory.
    pub toolkit_home_var: String,
    /// Secondary alias for the toolkit home, cleared on uninstall.
    pub toolkit_home_alias_var: String,
    /// Name of the `PATH`-like variable rewritten on uninstall.
    pub search_path_var: String,
    /// Python interpreter used to load the numerical library.
    pub python_interpreter: String,
    /// Default toolkit installation roots.
    pub install_roots: Vec<PathBuf>,
    /// Prefix of versioned folders below an install root (`v12.1`).
    pub version_folder_prefix: String,
    /// Package-registry name filters removed by the uninstaller.
    pub vendor_package_filters: Vec<String>,
    /// Filter used by the finder when querying the package registry.
    pub component_filter: String,
    /// Case-insensitive tokens; `PATH` entries containing any of them are dropped.
    pub vendor_path_tokens: Vec<String>,
    /// Timeout applied to read-only probe commands.
    pub probe_timeout: Duration,
    /// Timeout applied to package-registry uninstall commands.
    pub uninstall_timeout: Duration,
    /// Matrix size for the extended library benchmark.
    pub benchmark_size: u32,
}

impl InspectorConfig {
    /// Build the default configuration for a platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            driver_tool: "nvidia-smi".to_string(),
            compiler_command: "nvcc".to_string(),
            compiler_version_flag: "--version".to_string(),
            toolkit_home_var: "CUDA_PATH".to_string(),
            toolkit_home_alias_var: "CUDA_HOME".to_string(),
            search_path_var: "PATH".to_string(),
            python_interpreter: platform.python_command().to_string(),
            install_roots: vec![
                PathBuf::from(r"C:\Program Files\NVIDIA GPU Computing Toolkit\CUDA"),
                PathBuf::from(r"C:\CUDA"),
            ],
            version_folder_prefix: "v".to_string(),
            vendor_package_filters: vec!["CUDA".to_string(), "NVIDIA".to_string()],
            component_filter: "CUDA".to_string(),
            vendor_path_tokens: vec!["cuda".to_string(), "nvidia".to_string()],
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            uninstall_timeout: DEFAULT_UNINSTALL_TIMEOUT,
            benchmark_size: DEFAULT_BENCHMARK_SIZE,
        }
    }

    /// Environment variables cleared by the uninstaller, in order.
    pub fn toolkit_env_vars(&self) -> [&str; 2] {
        [
            self.toolkit_home_var.as_str(),
            self.toolkit_home_alias_var.as_str(),
        ]
    }

    /// Override the probe timeout.
    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Override the Python interpreter.
    #[must_use]
    pub fn with_python_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.python_interpreter = interpreter.into();
        self
    }

    /// Override the install roots.
    #[must_use]
    pub fn with_install_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.install_roots = roots;
        self
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}
