//! Command-line adapter for `gpuscan`.
//!
//! Parses arguments, composes the runtime adapters, runs the core services
//! and renders their findings. See [`bootstrap`] for the composition root.

#![deny(unsafe_code)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
