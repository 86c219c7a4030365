//! `gpuscan check`: driver, toolkit and library probes plus a summary.

use std::io::{self, Write};

use anyhow::{Context, Result};
use gpuscan_core::{InspectionSummary, LibraryProbeMode, SystemInfo};
use serde::Serialize;

use crate::bootstrap::CliContext;
use crate::presentation::render_check_report;

#[derive(Serialize)]
struct CheckDocument<'a> {
    system: &'a SystemInfo,
    #[serde(flatten)]
    inspection: &'a InspectionSummary,
}

/// Execute the check command against stdout.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    run(ctx, json, &mut io::stdout()).await
}

/// Run all probes and write the report (or JSON document) to `out`.
pub async fn run(ctx: &CliContext, json: bool, out: &mut dyn Write) -> Result<()> {
    let summary = ctx.probe_set().inspect(LibraryProbeMode::Basic).await;

    if json {
        let document = CheckDocument {
            system: &ctx.system,
            inspection: &summary,
        };
        serde_json::to_writer_pretty(&mut *out, &document)
            .context("Failed to serialize check results")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_check_report(ctx.palette, &ctx.system, &summary))?;
    }
    Ok(())
}
