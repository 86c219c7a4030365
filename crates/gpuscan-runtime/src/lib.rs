//! OS adapters for `gpuscan`.
//!
//! Every type here implements a port from `gpuscan-core` by touching the
//! real machine: child processes, the filesystem, environment variables,
//! the Windows installer database and the Python interpreter.

#![deny(unsafe_code)]

mod command;
mod elevation;
mod environment;
mod filesystem;
pub mod library;
pub mod registry;
mod system_info;

pub use command::TokioCommandRunner;
pub use elevation::OsElevation;
pub use environment::{OsEnvironment, SETX_MAX_VALUE_LEN, SYSTEM_ENVIRONMENT_KEY, SetxWriter};
pub use filesystem::OsFileSystem;
pub use library::PythonLibraryLoader;
pub use registry::WmicPackageRegistry;
pub use system_info::collect_system_info;
