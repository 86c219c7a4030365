//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core services expect from
//! infrastructure. They contain no process or filesystem implementation
//! details; `gpuscan-runtime` provides the real adapters and
//! [`crate::testing`] provides in-memory fakes.

pub mod command_runner;
pub mod confirmation;
pub mod elevation;
pub mod environment;
pub mod filesystem;
pub mod library_loader;
pub mod package_registry;

pub use command_runner::CommandRunner;
pub use confirmation::{
    CONFIRMATION_WORD, ConfirmationPort, MenuChoice, is_confirmation, parse_menu_choice,
};
pub use elevation::{ElevationPort, ElevationStatus, ensure_elevated};
pub use environment::{EnvironmentPort, SystemEnvironmentWriter};
pub use filesystem::FileSystemPort;
pub use library_loader::{LibraryLoadError, LibraryLoader, LibraryProbeMode};
pub use package_registry::{InstalledPackage, PackageRegistry, PackageRegistryError};
