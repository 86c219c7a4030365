//! Report rendering.
//!
//! # Guidelines
//!
//! - Keep this module format-only: findings in, text out
//! - Handlers own stdout; nothing here prints

pub mod report;
pub mod style;
pub mod system;
pub mod torch;
pub mod uninstall;

pub use report::{banner, render_check_report, render_probe, render_summary};
pub use style::Palette;
pub use torch::{TorchFindings, render_torch_report};
pub use uninstall::{UninstallFindings, render_session_outcome, render_uninstall_overview};
