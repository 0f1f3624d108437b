//! Promotional tasks: start everything startable, then report what the
//! server says is completed.

use crate::api::PitchtalkApi;
use crate::error::PitchtalkError;
use crate::models::{Session, Task, TaskStatus};
use crate::transport::Transport;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTask {
    pub id: String,
    pub title: String,
    pub reward_coins: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskReport {
    /// Titles of tasks whose start call succeeded
    pub started: Vec<String>,
    pub completed: Vec<CompletedTask>,
    pub failures: Vec<PitchtalkError>,
}

/// Tasks in `INITIAL` state that are not on the skip list.
pub fn startable<'t>(tasks: &'t [Task], skipped_ids: &[String]) -> Vec<&'t Task> {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Initial)
        .filter(|t| !skipped_ids.iter().any(|id| id == &t.id))
        .collect()
}

/// Verified `COMPLETED_CLAIMED` tasks, described from the original listing.
/// Ids the listing never contained are dropped.
pub fn completed_from_listing(listed: &[Task], verified: &[Task]) -> Vec<CompletedTask> {
    verified
        .iter()
        .filter(|t| t.status == TaskStatus::CompletedClaimed)
        .filter_map(|v| listed.iter().find(|t| t.id == v.id))
        .map(|t| CompletedTask {
            id: t.id.clone(),
            title: t.template.title.clone(),
            reward_coins: t.template.reward_coins,
        })
        .collect()
}

/// Listing failure is returned as an error. Start and verify failures are
/// logged and collected in the report; one bad task does not stop the rest.
pub async fn run_tasks<T: Transport + ?Sized>(
    api: &PitchtalkApi<'_, T>,
    session: &Session,
    skipped_ids: &[String],
) -> Result<TaskReport, PitchtalkError> {
    let tasks = api.list_tasks(session).await?;
    let mut report = TaskReport::default();

    for task in startable(&tasks, skipped_ids) {
        match api.start_task(session, &task.id).await {
            Ok(_) => {
                info!(target: "success", "Started task: {} ✅", task.template.title);
                report.started.push(task.template.title.clone());
            }
            Err(e) => {
                error!("Error starting task {}: {}", task.template.title, e);
                report.failures.push(e);
            }
        }
    }

    match api.verify_tasks(session).await {
        Ok(verified) => {
            for done in completed_from_listing(&tasks, &verified) {
                info!(
                    target: "success",
                    "Successfully completed task {} | Reward: 💰 {}",
                    done.title, done.reward_coins
                );
                report.completed.push(done);
            }
        }
        Err(e) => {
            error!("Error verifying tasks: {}", e);
            report.failures.push(e);
        }
    }

    Ok(report)
}
