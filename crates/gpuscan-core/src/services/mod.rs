//! Inspection and uninstall services.
//!
//! Everything here talks to the outside world only through [`crate::ports`].

pub mod driver;
pub mod finder;
pub mod library;
pub mod orchestrator;
pub mod path_filter;
pub mod probe_set;
pub mod toolkit;
pub mod uninstall_session;

pub use driver::{TRUNCATION_MARKER, probe_driver, probe_driver_banner};
pub use finder::ComponentFinder;
pub use library::{
    ACCELERATOR_UNAVAILABLE, LIBRARY_NOT_INSTALLED, TRANSFER_DETAIL, probe_library,
    summarize_library,
};
pub use orchestrator::{OrchestratorError, UninstallOrchestrator};
pub use path_filter::{PathRewrite, filter_path_entries};
pub use probe_set::{InspectionSummary, ProbeSet};
pub use toolkit::{COMPILER_NOT_FOUND, VARIABLE_NOT_SET, probe_toolkit};
pub use uninstall_session::{SessionError, SessionOutcome, run_uninstall_session};
