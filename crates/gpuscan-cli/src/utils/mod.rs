//! Utility modules for CLI operations.

pub mod input;

pub use input::{AssumeYes, ConsoleConfirmation, PromptConfirmation, wait_for_enter};
