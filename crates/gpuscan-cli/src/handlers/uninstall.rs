//! `gpuscan uninstall`: remove the CUDA toolkit and its traces.

use std::io::{self, Write};

use anyhow::Result;
use gpuscan_core::ports::ensure_elevated;
use gpuscan_core::{
    ConfirmationPort, ElevationStatus, LibraryProbeMode, Platform, run_uninstall_session,
};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::commands::PAUSE_ON_EXIT_FLAG;
use crate::error::CliError;
use crate::presentation::uninstall::has_fatal_failures;
use crate::presentation::{UninstallFindings, render_session_outcome, render_uninstall_overview};
use crate::utils::{AssumeYes, ConsoleConfirmation};

/// Lines of `nvidia-smi` output shown in the details section.
const DRIVER_BANNER_LINES: usize = 10;

/// Execute the uninstaller with terminal prompts, or none with `--yes`.
pub async fn execute(ctx: &CliContext, yes: bool) -> Result<()> {
    // Forwarded unchanged to an elevated relaunch.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if yes {
        run(ctx, &AssumeYes, &args, &mut io::stdout()).await
    } else {
        run(ctx, &ConsoleConfirmation::console(), &args, &mut io::stdout()).await
    }
}

/// Arguments for the elevated copy: the original ones plus the exit pause.
fn relaunch_args(args: &[String]) -> Vec<String> {
    let mut forwarded = args.to_vec();
    if !forwarded.iter().any(|arg| arg == PAUSE_ON_EXIT_FLAG) {
        forwarded.push(PAUSE_ON_EXIT_FLAG.to_string());
    }
    forwarded
}

/// Elevation, overview, prompts, orchestration and the final report.
pub async fn run(
    ctx: &CliContext,
    confirmation: &dyn ConfirmationPort,
    args: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    if ctx.config.platform != Platform::Windows {
        return Err(CliError::UnsupportedPlatform(format!(
            "the CUDA uninstaller only runs on Windows (detected {})",
            ctx.system.os_name
        ))
        .into());
    }

    let forwarded = relaunch_args(args);
    let is_elevated = match ensure_elevated(ctx.elevation.as_ref(), &forwarded).await {
        ElevationStatus::AlreadyElevated => true,
        ElevationStatus::RelaunchRequested => {
            info!("relaunched elevated; exiting this instance");
            writeln!(
                out,
                "Administrator privileges required; continuing in the elevated window."
            )?;
            return Ok(());
        }
        ElevationStatus::RelaunchDenied(reason) => {
            return Err(CliError::ElevationDenied(reason).into());
        }
    };

    let probes = ctx.probe_set();
    let driver = probes.driver_banner(DRIVER_BANNER_LINES).await;
    let toolkit = probes.toolkit().await;
    let library = probes.library(LibraryProbeMode::Basic).await;
    let records = ctx.finder().find_installed().await;

    let findings = UninstallFindings {
        system: &ctx.system,
        driver: &driver,
        toolkit: &toolkit,
        library: &library,
        records: &records,
    };
    write!(out, "{}", render_uninstall_overview(ctx.palette, &findings))?;
    out.flush()?;

    let orchestrator = ctx.orchestrator();
    let outcome = run_uninstall_session(&records, confirmation, &orchestrator, is_elevated)
        .await
        .map_err(CliError::from)?;
    write!(out, "{}", render_session_outcome(ctx.palette, &outcome))?;

    if has_fatal_failures(&outcome) {
        return Err(CliError::General(
            "some CUDA components could not be removed; see the list above".to_string(),
        )
        .into());
    }
    Ok(())
}
