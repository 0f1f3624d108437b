//! Farming lifecycle: start, wait, claim, and optionally restart.

use crate::api::PitchtalkApi;
use crate::error::PitchtalkError;
use crate::models::{FarmingRecord, Session};
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Where an existing farming stands relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmingPhase {
    Running,
    Claimable,
}

pub fn phase(record: &FarmingRecord, now: DateTime<Utc>) -> FarmingPhase {
    if now < record.end_time {
        FarmingPhase::Running
    } else {
        FarmingPhase::Claimable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmingOutcome {
    /// No farming existed; a new one was created.
    Started(FarmingRecord),
    /// Existing farming has not reached its end time. Nothing was changed.
    InProgress(FarmingRecord),
    /// Existing farming was finished and has been claimed. `restarted` is
    /// `None` when re-arming is off, otherwise the result of the new create.
    Claimed {
        finished: FarmingRecord,
        restarted: Option<Result<FarmingRecord, PitchtalkError>>,
    },
}

impl FarmingOutcome {
    /// True when a requested restart did not go through.
    pub fn restart_failed(&self) -> bool {
        matches!(self, Self::Claimed { restarted: Some(Err(_)), .. })
    }
}

/// Moves one account's farming forward by at most one claim and one create.
///
/// - `farming_id == None`: create.
/// - running: report only.
/// - finished: claim, then create again when `rearm` is set. A failed claim
///   returns the error and skips the restart.
pub async fn advance_farming<T: Transport + ?Sized>(
    api: &PitchtalkApi<'_, T>,
    session: &Session,
    rearm: bool,
    now: DateTime<Utc>,
) -> Result<FarmingOutcome, PitchtalkError> {
    if session.farming_id.is_none() {
        let record = api.create_farming(session).await?;
        info!(target: "success", "Farming started with id: {} 🚜", record.id);
        info!("Completion time: {}", record.end_time_display());
        return Ok(FarmingOutcome::Started(record));
    }

    let record = api.get_farming(session).await?;
    match phase(&record, now) {
        FarmingPhase::Running => {
            info!(target: "success", "Farming in progress with id: {} 🚜", record.id);
            info!("Completion time: {}", record.end_time_display());
            Ok(FarmingOutcome::InProgress(record))
        }
        FarmingPhase::Claimable => {
            info!(target: "success", "Farming with id {} has completed", record.id);
            api.claim_farming(session).await?;
            info!(target: "success", "Successfully claimed farming rewards 🎁");

            let restarted = if rearm {
                let created = api.create_farming(session).await;
                match &created {
                    Ok(next) => {
                        info!(target: "success", "Started new farming with id: {} 🚜", next.id);
                        info!("New completion time: {}", next.end_time_display());
                    }
                    Err(e) => error!("Error starting new farming: {}", e),
                }
                Some(created)
            } else {
                None
            };

            Ok(FarmingOutcome::Claimed {
                finished: record,
                restarted,
            })
        }
    }
}
