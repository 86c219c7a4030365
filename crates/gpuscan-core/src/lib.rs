//! Core of `gpuscan`: GPU driver, CUDA toolkit and PyTorch diagnostics plus
//! the Windows CUDA uninstaller.
//!
//! This crate holds domain types, port traits and the services built on
//! them. It performs no I/O of its own; `gpuscan-runtime` supplies the
//! adapters and `gpuscan-cli` wires everything together.

#![deny(unsafe_code)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// In-memory fakes for every port
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{
    DEFAULT_BENCHMARK_SIZE, DEFAULT_PROBE_TIMEOUT, DEFAULT_UNINSTALL_TIMEOUT, InspectorConfig,
    Platform,
};
pub use domain::{
    AcceleratorDevice, ActionOutcome, Benchmark, BenchmarkPath, CommandOutcome, CommandRequest,
    Component, ComponentSource, FileOpResult, InstalledComponentRecord, LibraryReport,
    ProbeResult, PythonEnvironment, SystemInfo, TransferCheck, UninstallActionResult,
    UninstallStep,
};
pub use ports::{
    CommandRunner, ConfirmationPort, ElevationPort, ElevationStatus, EnvironmentPort,
    FileSystemPort, InstalledPackage, LibraryLoadError, LibraryLoader, LibraryProbeMode,
    MenuChoice, PackageRegistry, PackageRegistryError, SystemEnvironmentWriter,
};
pub use services::{
    ComponentFinder, InspectionSummary, OrchestratorError, PathRewrite, ProbeSet, SessionError,
    SessionOutcome, UninstallOrchestrator, filter_path_entries, run_uninstall_session,
};
