//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the GPU diagnostics tool.
///
/// Global options apply to every subcommand.
#[derive(Debug, Parser)]
#[command(name = "gpuscan")]
#[command(
    about = "Check NVIDIA driver, CUDA toolkit and PyTorch GPU support; remove CUDA on Windows"
)]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Disable coloured output (also honoured through NO_COLOR)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Timeout in seconds for each external command
    #[arg(
        long,
        global = true,
        env = "GPUSCAN_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Python interpreter used to load PyTorch
    #[arg(long, global = true, env = "GPUSCAN_PYTHON")]
    pub python: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
