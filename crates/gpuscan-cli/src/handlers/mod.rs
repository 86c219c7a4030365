//! Command handlers.
//!
//! Each handler takes the composed [`CliContext`](crate::bootstrap::CliContext),
//! runs core services and writes rendered output. `execute` targets stdout;
//! `run` takes any writer so the handlers can be tested end to end.

pub mod check;
pub mod torch;
pub mod uninstall;
