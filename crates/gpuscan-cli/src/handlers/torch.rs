//! `gpuscan torch`: extended PyTorch report.

use std::io::{self, Write};

use anyhow::{Context, Result};
use gpuscan_core::{LibraryProbeMode, ProbeResult, SystemInfo};
use serde::Serialize;

use crate::bootstrap::CliContext;
use crate::presentation::{TorchFindings, render_torch_report};

/// Lines of `nvidia-smi` output kept for the driver cross-check.
const DRIVER_BANNER_LINES: usize = 3;

#[derive(Serialize)]
struct TorchDocument<'a> {
    system: &'a SystemInfo,
    driver: &'a ProbeResult,
    toolkit: &'a ProbeResult,
    library: &'a ProbeResult,
}

/// Execute the torch command against stdout.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    run(ctx, json, &mut io::stdout()).await
}

pub async fn run(ctx: &CliContext, json: bool, out: &mut dyn Write) -> Result<()> {
    let probes = ctx.probe_set();
    let driver = probes.driver_banner(DRIVER_BANNER_LINES).await;
    let toolkit = probes.toolkit().await;
    let library = probes.library(LibraryProbeMode::Extended).await;

    if json {
        let document = TorchDocument {
            system: &ctx.system,
            driver: &driver,
            toolkit: &toolkit,
            library: &library,
        };
        serde_json::to_writer_pretty(&mut *out, &document)
            .context("Failed to serialize library report")?;
        writeln!(out)?;
    } else {
        let findings = TorchFindings {
            system: &ctx.system,
            driver: &driver,
            toolkit: &toolkit,
            library: &library,
        };
        write!(out, "{}", render_torch_report(ctx.palette, &findings))?;
    }
    Ok(())
}
