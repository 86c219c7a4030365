//! Subcommands.

use clap::Subcommand;

/// Added to the arguments of an elevated relaunch. The relaunched copy runs
/// in its own console window, which would close before the report is read.
pub const PAUSE_ON_EXIT_FLAG: &str = "--pause-on-exit";

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check the NVIDIA driver, CUDA toolkit and PyTorch CUDA support
    Check {
        /// Print the findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detailed PyTorch report: build info, devices, benchmarks and recommendations
    Torch {
        /// Print the findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the CUDA toolkit and its traces (Windows, administrator)
    Uninstall {
        /// Skip the menu and the typed confirmation
        #[arg(short, long)]
        yes: bool,

        /// Wait for Enter before exiting
        #[arg(long, hide = true)]
        pause_on_exit: bool,
    },
}

impl Commands {
    /// Whether the process should wait for Enter before it exits.
    pub const fn pauses_on_exit(&self) -> bool {
        matches!(self, Self::Uninstall { pause_on_exit: true, .. })
    }
}
