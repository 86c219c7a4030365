//! Interactive uninstall flow: find, confirm twice, orchestrate.

use std::io;

use thiserror::Error;
use tracing::info;

use super::orchestrator::{OrchestratorError, UninstallOrchestrator};
use crate::domain::{InstalledComponentRecord, UninstallActionResult};
use crate::ports::{ConfirmationPort, MenuChoice};

/// How an uninstall session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The finder reported nothing; the orchestrator was not invoked.
    NothingInstalled,
    /// The user chose to abort at the menu or did not type the confirmation word.
    Declined,
    Completed(Vec<UninstallActionResult>),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("failed to read user input: {0}")]
    Input(#[from] io::Error),
}

/// Drive the confirmation prompts and, when accepted, the orchestrator.
///
/// The menu is asked first, then the typed confirmation. Declining at
/// either point performs no action.
pub async fn run_uninstall_session(
    records: &[InstalledComponentRecord],
    confirmation: &dyn ConfirmationPort,
    orchestrator: &UninstallOrchestrator,
    is_elevated: bool,
) -> Result<SessionOutcome, SessionError> {
    if records.is_empty() {
        info!("no installed components found");
        return Ok(SessionOutcome::NothingInstalled);
    }

    if confirmation.choose_action()? == MenuChoice::Abort {
        info!("uninstall aborted at menu");
        return Ok(SessionOutcome::Declined);
    }
    if !confirmation.confirm_uninstall()? {
        info!("uninstall not confirmed");
        return Ok(SessionOutcome::Declined);
    }

    let results = orchestrator.uninstall(records, is_elevated).await?;
    Ok(SessionOutcome::Completed(results))
}
