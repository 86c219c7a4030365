//! Library probe: numerical library presence and accelerator support.
//!
//! Three facts are kept apart because they can disagree:
//! - the library loaded (`LibraryReport::installed`)
//! - the library reports an accelerator (`available` on the result)
//! - a tensor actually reached the device (`LibraryReport::transfer`)

use tracing::warn;

use crate::domain::{Component, LibraryReport, ProbeResult};
use crate::ports::{LibraryLoader, LibraryProbeMode};

/// Error reported when the library cannot be imported.
pub const LIBRARY_NOT_INSTALLED: &str = "library not installed";

/// Error reported when the library loaded but sees no accelerator.
pub const ACCELERATOR_UNAVAILABLE: &str = "accelerator not available to library";

/// Leading text of the detail describing the device transfer check.
pub const TRANSFER_DETAIL: &str = "Tensor transfer to device";

/// Load the library through `loader` and summarise what it reports.
///
/// Loader failures (interpreter missing, garbled output) become the
/// result's `error`; they never escape the probe.
pub async fn probe_library(loader: &dyn LibraryLoader, mode: LibraryProbeMode) -> ProbeResult {
    match loader.load(mode).await {
        Ok(report) => summarize_library(loader.library_name(), report),
        Err(err) => {
            warn!(library = loader.library_name(), error = %err, "library probe failed");
            ProbeResult::unavailable(Component::Library, err.to_string())
        }
    }
}

/// Turn a [`LibraryReport`] into a probe finding.
pub fn summarize_library(name: &str, report: LibraryReport) -> ProbeResult {
    if !report.installed {
        let error = report
            .error
            .clone()
            .unwrap_or_else(|| LIBRARY_NOT_INSTALLED.to_string());
        return ProbeResult::unavailable(Component::Library, error).with_library(report);
    }

    let mut details = vec![format!(
        "{name} installed, version {}",
        report.version.as_deref().unwrap_or("unknown")
    )];

    if report.cuda_available {
        details.push(format!("{name} can use CUDA"));
        details.push(format!("CUDA devices: {}", report.devices.len()));
        if let Some(current) = report.current_device {
            details.push(format!("Current device: {current}"));
        }
        for device in &report.devices {
            details.push(format!("Device {}: {}", device.index, device.name));
        }
        if let Some(cuda) = &report.cuda_version {
            details.push(format!("CUDA version: {cuda}"));
        }
        match &report.transfer {
            Some(transfer) if transfer.succeeded => {
                details.push(format!("{TRANSFER_DETAIL} succeeded"));
            }
            Some(transfer) => details.push(format!(
                "{TRANSFER_DETAIL} failed: {}",
                transfer.error.as_deref().unwrap_or("unknown error")
            )),
            None => {}
        }
    } else {
        details.push(format!("{name} cannot use CUDA"));
    }

    let error = report.error.clone().or_else(|| {
        (!report.cuda_available).then(|| ACCELERATOR_UNAVAILABLE.to_string())
    });

    let mut result = ProbeResult::available(Component::Library)
        .with_version(report.version.clone())
        .with_details(details)
        .with_error(error);
    result.available = report.cuda_available;
    result.with_library(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcceleratorDevice, TransferCheck};
    use crate::ports::LibraryLoadError;
    use crate::testing::FakeLibraryLoader;

    fn capable_report(transfer_ok: bool) -> LibraryReport {
        LibraryReport {
            installed: true,
            version: Some("2.3.1+cu121".to_string()),
            cuda_available: true,
            cuda_version: Some("12.1".to_string()),
            has_cuda_functions: true,
            devices: vec![AcceleratorDevice {
                index: 0,
                name: "NVIDIA GeForce RTX 4090".to_string(),
                ..AcceleratorDevice::default()
            }],
            current_device: Some(0),
            transfer: Some(TransferCheck {
                succeeded: transfer_ok,
                error: (!transfer_ok)
                    .then(|| "CUDA error: no kernel image is available".to_string()),
            }),
            ..LibraryReport::default()
        }
    }

    #[tokio::test]
    async fn not_installed_is_a_negative_finding() {
        let loader = FakeLibraryLoader::with_report(LibraryReport::default());
        let result = probe_library(&loader, LibraryProbeMode::Basic).await;

        assert!(!result.available);
        assert_eq!(result.error.as_deref(), Some(LIBRARY_NOT_INSTALLED));
        assert!(!result.library.unwrap().installed);
    }

    #[tokio::test]
    async fn loader_failure_is_caught_at_the_probe_boundary() {
        let loader = FakeLibraryLoader::with_error(LibraryLoadError::InterpreterUnavailable(
            "python3: program not found".to_string(),
        ));
        let result = probe_library(&loader, LibraryProbeMode::Basic).await;

        assert!(!result.available);
        assert!(result.error.unwrap().contains("interpreter unavailable"));
        assert!(result.library.is_none());
    }

    #[tokio::test]
    async fn installed_without_accelerator_is_still_installed() {
        let loader = FakeLibraryLoader::with_report(LibraryReport {
            installed: true,
            version: Some("2.3.1+cpu".to_string()),
            ..LibraryReport::default()
        });
        let result = probe_library(&loader, LibraryProbeMode::Basic).await;

        assert!(!result.available);
        assert_eq!(result.error.as_deref(), Some(ACCELERATOR_UNAVAILABLE));
        assert_eq!(result.version.as_deref(), Some("2.3.1+cpu"));
        assert!(result.library.unwrap().installed);
    }

    #[tokio::test]
    async fn capable_library_with_failed_transfer_keeps_both_facts() {
        let loader = FakeLibraryLoader::with_report(capable_report(false));
        let result = probe_library(&loader, LibraryProbeMode::Basic).await;

        assert!(result.available);
        assert_eq!(result.error, None);
        assert_eq!(result.library.as_ref().unwrap().transfer_succeeded(), Some(false));
        assert!(
            result
                .details
                .iter()
                .any(|d| d.starts_with("Tensor transfer to device failed"))
        );
    }

    #[tokio::test]
    async fn capable_library_lists_devices() {
        let loader = FakeLibraryLoader::with_report(capable_report(true));
        let result = probe_library(&loader, LibraryProbeMode::Extended).await;

        assert!(result.available);
        assert!(result.details.contains(&"Device 0: NVIDIA GeForce RTX 4090".to_string()));
        assert!(result.details.contains(&"Tensor transfer to device succeeded".to_string()));
        assert_eq!(loader.modes(), vec![LibraryProbeMode::Extended]);
    }

    #[tokio::test]
    async fn unexpected_error_after_load_is_surfaced() {
        let loader = FakeLibraryLoader::with_report(LibraryReport {
            installed: true,
            error: Some("RuntimeError: CUDA driver initialization failed".to_string()),
            ..LibraryReport::default()
        });
        let result = probe_library(&loader, LibraryProbeMode::Basic).await;

        assert!(!result.available);
        assert!(result.error.unwrap().contains("initialization failed"));
    }
}
