//! Domain types shared by probes, the uninstaller and the reporter.
//!
//! Everything here is plain data: created by a probe or action, handed to
//! the reporter, and dropped at process exit.

mod command;
mod library;
mod probe;
mod system;
mod uninstall;

pub use command::{CommandOutcome, CommandRequest};
pub use library::{
    AcceleratorDevice, Benchmark, BenchmarkPath, LibraryReport, PythonEnvironment, TransferCheck,
};
pub use probe::{Component, ProbeResult};
pub use system::SystemInfo;
pub use uninstall::{
    ActionOutcome, ComponentSource, FileOpResult, InstalledComponentRecord, UninstallActionResult,
    UninstallStep,
};
