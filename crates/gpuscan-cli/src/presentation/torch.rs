//! Report rendering for `gpuscan torch`.

use std::fmt::Write as _;

use gpuscan_core::{Benchmark, LibraryReport, ProbeResult, SystemInfo};

use super::report::{WIDE_BANNER, banner, render_probe};
use super::style::Palette;
use super::system::{format_gib, render_python_environment, render_system_info};

const INSTALL_CPU: &str = "pip install torch torchvision torchaudio";
const INSTALL_GPU: &str =
    "pip install torch torchvision torchaudio --index-url https://download.pytorch.org/whl/cu118";
const GET_STARTED_URL: &str = "https://pytorch.org/get-started/locally/";

/// Findings rendered by the library report.
#[derive(Debug, Clone, Copy)]
pub struct TorchFindings<'a> {
    pub system: &'a SystemInfo,
    /// Driver probe keeping the first lines of the tool's banner.
    pub driver: &'a ProbeResult,
    pub toolkit: &'a ProbeResult,
    /// Extended library probe.
    pub library: &'a ProbeResult,
}

/// Full library report: environment, toolkit, library, recommendations.
pub fn render_torch_report(palette: Palette, findings: &TorchFindings<'_>) -> String {
    let report = findings.library.library.as_ref();

    let mut out = String::new();
    out.push_str(&banner("PyTorch GPU/CPU build check", WIDE_BANNER));
    out.push_str(&render_system_info(findings.system));
    out.push_str(&render_python_environment(
        report.and_then(|r| r.python.as_ref()),
    ));

    out.push_str("\nChecking CUDA toolkit...\n");
    out.push_str(&render_probe(palette, findings.driver));
    out.push_str(&render_probe(palette, findings.toolkit));

    out.push('\n');
    out.push_str(&render_library(palette, findings.library, findings.driver));

    out.push('\n');
    out.push_str(&render_recommendations(findings.library.available));

    out.push('\n');
    out.push_str(&banner("Check complete", WIDE_BANNER));
    out
}

/// Library section: build, devices, diagnosis and benchmarks.
pub fn render_library(palette: Palette, library: &ProbeResult, driver: &ProbeResult) -> String {
    let mut out = String::new();
    let Some(report) = &library.library else {
        let error = library.error.as_deref().unwrap_or("unknown error");
        let line = palette.fail(&format!("Error while checking PyTorch: {error}"));
        let _ = writeln!(out, "{line}");
        return out;
    };

    if !report.installed {
        let _ = writeln!(out, "{}", palette.fail("PyTorch not installed"));
        out.push_str(&render_install_hints());
        return out;
    }

    let _ = writeln!(out, "{}", palette.ok("PyTorch installed"));
    let _ = writeln!(
        out,
        "  - PyTorch version: {}",
        report.version.as_deref().unwrap_or("unknown")
    );
    for line in &report.build_info {
        let _ = writeln!(out, "  - {line}");
    }

    if report.cuda_available {
        out.push_str(&render_devices(palette, report));
    } else if report.has_cuda_functions {
        out.push_str(&render_cuda_diagnosis(palette, driver));
    } else {
        let _ = writeln!(out, "\n{}", palette.ok("PyTorch CPU-only build"));
        let _ = writeln!(out, "  - No CUDA support compiled in");
    }

    for bench in &report.benchmarks {
        out.push_str(&render_benchmark(palette, bench));
    }

    if let Some(error) = &report.error {
        let line = palette.fail(&format!("Error while checking PyTorch: {error}"));
        let _ = writeln!(out, "\n{line}");
    }
    out
}

fn render_devices(palette: Palette, report: &LibraryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", palette.ok("PyTorch GPU build (CUDA available)"));
    let _ = writeln!(
        out,
        "  - CUDA version: {}",
        report.cuda_version.as_deref().unwrap_or("unknown")
    );
    let _ = writeln!(
        out,
        "  - cuDNN version: {}",
        report.cudnn_version.as_deref().unwrap_or("unknown")
    );
    let _ = writeln!(out, "  - GPU count: {}", report.devices.len());

    for device in &report.devices {
        let _ = writeln!(out, "\n  GPU #{}:", device.index);
        let _ = writeln!(out, "    - Name: {}", device.name);
        if let Some([major, minor]) = device.capability {
            let _ = writeln!(out, "    - Compute capability: {major}.{minor}");
        }
        match (device.total_memory_bytes, device.free_memory_bytes) {
            (Some(total), Some(free)) => {
                let _ = writeln!(out, "    - Total memory: {}", format_gib(total));
                let _ = writeln!(out, "    - Free memory: {}", format_gib(free));
            }
            (Some(total), None) => {
                let _ = writeln!(out, "    - Total memory: {}", format_gib(total));
            }
            _ => {
                let _ = writeln!(out, "    - Memory information unavailable");
            }
        }
    }

    if let Some(transfer) = &report.transfer {
        let line = if transfer.succeeded {
            "Tensor transfer to GPU succeeded".to_string()
        } else {
            format!(
                "Tensor transfer to GPU failed: {}",
                transfer.error.as_deref().unwrap_or("unknown error")
            )
        };
        let _ = writeln!(out, "\n  {}", palette.status(transfer.succeeded, &line));
    }
    out
}

/// CUDA build that cannot reach a device: likely causes plus a driver cross-check.
fn render_cuda_diagnosis(palette: Palette, driver: &ProbeResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        palette.fail("PyTorch has CUDA functions but CUDA is unavailable")
    );
    out.push_str("  Likely causes:\n");
    out.push_str("  - NVIDIA driver missing or incompatible\n");
    out.push_str("  - CUDA version incompatible with this PyTorch build\n");
    out.push_str("  - GPU not supported by this CUDA version\n");

    if driver.available {
        out.push_str("\n  NVIDIA driver installed, but it may not match PyTorch's CUDA version\n");
        for line in &driver.details {
            let _ = writeln!(out, "  {}", line.trim());
        }
    } else {
        out.push_str("\n  NVIDIA driver not detected or nvidia-smi could not run\n");
    }
    out
}

fn render_benchmark(palette: Palette, bench: &Benchmark) -> String {
    let label = bench.path.label();
    let mut out = String::new();
    let _ = writeln!(out, "\nTesting {label} compute...");
    match (bench.elapsed_ms, &bench.error) {
        (Some(elapsed), None) => {
            let _ = writeln!(
                out,
                "  - {size}x{size} matrix multiplication: {elapsed:.2} ms",
                size = bench.size
            );
            let _ = writeln!(out, "  {}", palette.ok(&format!("{label} compute test passed")));
        }
        (_, error) => {
            let reason = error.as_deref().unwrap_or("no timing recorded");
            let _ = writeln!(
                out,
                "  {}",
                palette.fail(&format!("{label} compute test failed: {reason}"))
            );
        }
    }
    out
}

fn render_install_hints() -> String {
    format!(
        "  Install PyTorch with one of:\n  \
         - CPU build: {INSTALL_CPU}\n  \
         - GPU build: {INSTALL_GPU}\n  \
         (pick the index URL matching your CUDA version; the example above is CUDA 11.8)\n"
    )
}

/// Next steps depending on whether the library can use CUDA.
pub fn render_recommendations(cuda_usable: bool) -> String {
    let lines = if cuda_usable {
        [
            "PyTorch is ready for GPU acceleration".to_string(),
            "Move models and tensors with .cuda() or device='cuda' to use the GPU".to_string(),
            "For large models, torch.cuda.amp mixed precision improves performance".to_string(),
        ]
    } else {
        [
            "If you have an NVIDIA GPU, install a CUDA-enabled PyTorch build".to_string(),
            format!("Visit {GET_STARTED_URL} for the install command matching your system"),
            "Make sure the NVIDIA driver and CUDA versions are compatible with PyTorch".to_string(),
        ]
    };
    let mut out = String::from("Recommendations:\n");
    for (number, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{}. {line}", number + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use gpuscan_core::{AcceleratorDevice, BenchmarkPath, Component, TransferCheck};

    fn system() -> SystemInfo {
        SystemInfo {
            os_name: "Windows".to_string(),
            os_version: "11".to_string(),
            kernel_version: None,
            architecture: "x86_64".to_string(),
            total_memory_bytes: 0,
            collected_at: Local.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
        }
    }

    fn library(report: LibraryReport) -> ProbeResult {
        let available = report.cuda_available;
        let mut result = ProbeResult::available(Component::Library).with_library(report);
        result.available = available;
        result
    }

    fn driver() -> ProbeResult {
        ProbeResult::available(Component::Driver)
            .with_details([
                "Fri Oct 16 08:00:00 2026",
                "| NVIDIA-SMI 552.22   Driver Version: 552.22 |",
            ])
    }

    #[test]
    fn gpu_build_lists_devices_with_memory_in_gib() {
        let result = library(LibraryReport {
            installed: true,
            version: Some("2.3.1+cu121".to_string()),
            cuda_available: true,
            cuda_version: Some("12.1".to_string()),
            cudnn_version: Some("8902".to_string()),
            has_cuda_functions: true,
            devices: vec![AcceleratorDevice {
                index: 0,
                name: "NVIDIA GeForce RTX 4090".to_string(),
                capability: Some([8, 9]),
                total_memory_bytes: Some(25_769_803_776),
                free_memory_bytes: Some(0),
            }],
            transfer: Some(TransferCheck {
                succeeded: true,
                error: None,
            }),
            benchmarks: vec![Benchmark {
                path: BenchmarkPath::Cuda,
                size: 1000,
                elapsed_ms: Some(0.734),
                error: None,
            }],
            ..LibraryReport::default()
        });

        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("✓ PyTorch GPU build (CUDA available)"));
        assert!(text.contains("  - cuDNN version: 8902"));
        assert!(text.contains("  GPU #0:"));
        assert!(text.contains("    - Compute capability: 8.9"));
        assert!(text.contains("    - Total memory: 24.00 GB"));
        assert!(text.contains("    - Free memory: 0.00 GB"));
        assert!(text.contains("✓ Tensor transfer to GPU succeeded"));
        assert!(text.contains("  - 1000x1000 matrix multiplication: 0.73 ms"));
        assert!(text.contains("✓ GPU compute test passed"));
    }

    #[test]
    fn device_without_memory_figures_still_listed() {
        let result = library(LibraryReport {
            installed: true,
            version: Some("2.3.1+cu121".to_string()),
            cuda_available: true,
            has_cuda_functions: true,
            devices: vec![AcceleratorDevice {
                index: 0,
                name: "NVIDIA GeForce RTX 4090".to_string(),
                capability: Some([8, 9]),
                ..AcceleratorDevice::default()
            }],
            ..LibraryReport::default()
        });

        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("    - Name: NVIDIA GeForce RTX 4090"));
        assert!(text.contains("    - Memory information unavailable"));
        assert!(!text.contains("Error while checking PyTorch"));
    }

    #[test]
    fn cuda_build_without_device_explains_likely_causes() {
        let result = library(LibraryReport {
            installed: true,
            version: Some("2.3.1+cu121".to_string()),
            has_cuda_functions: true,
            ..LibraryReport::default()
        });

        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("✗ PyTorch has CUDA functions but CUDA is unavailable"));
        assert!(text.contains("Likely causes:"));
        assert!(text.contains("NVIDIA driver installed, but it may not match"));
        assert!(text.contains("  | NVIDIA-SMI 552.22   Driver Version: 552.22 |"));

        let no_driver = ProbeResult::unavailable(Component::Driver, "not found");
        let text = render_library(Palette::plain(), &result, &no_driver);
        assert!(text.contains("NVIDIA driver not detected"));
    }

    #[test]
    fn cpu_only_build_and_failed_benchmark() {
        let result = library(LibraryReport {
            installed: true,
            version: Some("2.3.1+cpu".to_string()),
            benchmarks: vec![Benchmark {
                path: BenchmarkPath::Cpu,
                size: 1000,
                elapsed_ms: None,
                error: Some("RuntimeError: out of memory".to_string()),
            }],
            ..LibraryReport::default()
        });

        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("✓ PyTorch CPU-only build"));
        assert!(text.contains("✗ CPU compute test failed: RuntimeError: out of memory"));
    }

    #[test]
    fn missing_library_prints_install_hints() {
        let result = ProbeResult::unavailable(Component::Library, "library not installed")
            .with_library(LibraryReport::default());

        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("✗ PyTorch not installed"));
        assert!(text.contains(INSTALL_CPU));
        assert!(text.contains("--index-url https://download.pytorch.org/whl/cu118"));
    }

    #[test]
    fn loader_failure_without_report() {
        let result = ProbeResult::unavailable(
            Component::Library,
            "interpreter unavailable: python3: program not found",
        );
        let text = render_library(Palette::plain(), &result, &driver());
        assert!(text.contains("✗ Error while checking PyTorch: interpreter unavailable"));
    }

    #[test]
    fn recommendations_follow_cuda_usability() {
        assert!(render_recommendations(true).contains("torch.cuda.amp"));
        assert!(render_recommendations(false).contains(GET_STARTED_URL));
    }

    #[test]
    fn full_report_has_wide_banners() {
        let lib = library(LibraryReport::default());
        let toolkit =
            ProbeResult::unavailable(Component::ToolkitRuntime, "CUDA_PATH variable not set");
        let system = system();
        let drv = driver();
        let text = render_torch_report(
            Palette::plain(),
            &TorchFindings {
                system: &system,
                driver: &drv,
                toolkit: &toolkit,
                library: &lib,
            },
        );
        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("✗ CUDA toolkit not available: CUDA_PATH variable not set"));
        assert!(text.contains("Recommendations:"));
        assert!(text.trim_end().ends_with(&"=".repeat(60)));
    }
}
