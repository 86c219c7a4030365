//! Numerical library (PyTorch) sub-findings.
//!
//! These types mirror the JSON document emitted by the library bridge in
//! `gpuscan-runtime`. Every field defaults so a partially populated report
//! (the script failed half-way) still deserialises.

use serde::{Deserialize, Serialize};

/// Everything learned about the numerical library in one probe run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryReport {
    /// The library imported successfully.
    pub installed: bool,
    pub version: Option<String>,
    /// The library's own accelerator capability flag.
    pub cuda_available: bool,
    /// CUDA version the library was built against.
    pub cuda_version: Option<String>,
    pub cudnn_version: Option<String>,
    /// Build contains CUDA entry points (false for CPU-only wheels).
    pub has_cuda_functions: bool,
    /// Build configuration lines mentioning cuda, gpu, cudnn, nvidia, build or time.
    pub build_info: Vec<String>,
    pub devices: Vec<AcceleratorDevice>,
    pub current_device: Option<u32>,
    /// Small tensor allocation + transfer to device 0.
    pub transfer: Option<TransferCheck>,
    pub benchmarks: Vec<Benchmark>,
    pub python: Option<PythonEnvironment>,
    /// Unexpected error raised after the library loaded.
    pub error: Option<String>,
}

impl LibraryReport {
    /// Library present and its accelerator usable.
    pub const fn accelerator_usable(&self) -> bool {
        self.installed && self.cuda_available
    }

    /// Outcome of the device transfer, when one was attempted.
    pub fn transfer_succeeded(&self) -> Option<bool> {
        self.transfer.as_ref().map(|t| t.succeeded)
    }

    /// Library built with CUDA support that cannot reach an accelerator.
    pub const fn cuda_build_without_device(&self) -> bool {
        self.installed && !self.cuda_available && self.has_cuda_functions
    }
}

/// One accelerator visible to the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratorDevice {
    pub index: u32,
    pub name: String,
    /// Compute capability as `[major, minor]`.
    pub capability: Option<[u32; 2]>,
    pub total_memory_bytes: Option<u64>,
    /// Reserved-but-unallocated memory in the library's caching allocator.
    pub free_memory_bytes: Option<u64>,
}

/// Result of moving a tensor onto the first accelerator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferCheck {
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Execution path of a benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkPath {
    #[default]
    Cpu,
    Cuda,
}

impl BenchmarkPath {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Cuda => "GPU",
        }
    }
}

/// Timed square matrix multiplication. Diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Benchmark {
    pub path: BenchmarkPath,
    pub size: u32,
    pub elapsed_ms: Option<f64>,
    pub error: Option<String>,
}

impl Benchmark {
    pub const fn succeeded(&self) -> bool {
        self.elapsed_ms.is_some() && self.error.is_none()
    }
}

/// Interpreter that hosted the library probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonEnvironment {
    pub version: String,
    pub executable: String,
    pub prefix: String,
    pub virtualenv: bool,
}
