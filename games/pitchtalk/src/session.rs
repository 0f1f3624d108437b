//! Per-account session runner.
//!
//! One pass for one account moves through
//! `Unauthenticated -> Authenticated -> FarmingActive | FarmingAbsent
//! -> [FarmingClaimable] -> [TasksPending] -> Done`. A failed step is
//! logged and recorded; only the steps that depend on it are skipped.

use crate::api::PitchtalkApi;
use crate::config::PitchtalkConfig;
use crate::credential::Credential;
use crate::error::PitchtalkError;
use crate::farming::{advance_farming, FarmingOutcome};
use crate::tasks::{run_tasks, TaskReport};
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Unauthenticated,
    Authenticated,
    FarmingActive,
    FarmingAbsent,
    FarmingClaimable,
    TasksPending,
    Done,
}

/// Source of the current time, so farming expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Behaviour switches for a session, taken from [`PitchtalkConfig`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub referral_code: String,
    pub rearm_farming: bool,
    pub tasks_enabled: bool,
    pub skipped_task_ids: Vec<String>,
}

impl From<&PitchtalkConfig> for SessionOptions {
    fn from(config: &PitchtalkConfig) -> Self {
        Self {
            referral_code: config.referral_code.clone(),
            rearm_farming: config.rearm_farming,
            tasks_enabled: config.tasks_enabled,
            skipped_task_ids: config.skipped_task_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    /// Zero-based position in the account list
    pub index: usize,
    pub username: Option<String>,
    pub ip: Option<String>,
    /// Last state reached
    pub state: AccountState,
    /// Set when the account was not attempted this cycle
    pub skipped: bool,
    pub farming: Option<FarmingOutcome>,
    pub tasks: Option<TaskReport>,
    pub failures: Vec<PitchtalkError>,
}

impl AccountReport {
    fn new(index: usize) -> Self {
        Self {
            index,
            username: None,
            ip: None,
            state: AccountState::Unauthenticated,
            skipped: false,
            farming: None,
            tasks: None,
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.skipped && self.state == AccountState::Done && self.failures.is_empty()
    }

    fn fail(&mut self, err: PitchtalkError) {
        self.failures.push(err);
    }
}

/// Runs one account through a full pass.
pub async fn run_account<T: Transport + ?Sized>(
    transport: &T,
    index: usize,
    raw_credential: &str,
    options: &SessionOptions,
    clock: &dyn Clock,
) -> AccountReport {
    let mut report = AccountReport::new(index);

    if transport.is_proxied() {
        match transport.resolve_ip().await {
            Ok(ip) => report.ip = Some(ip),
            Err(e) => {
                warn!("Error checking proxy IP: {}", e);
                report.skipped = true;
                report.fail(e);
                return report;
            }
        }
    }

    let credential = match Credential::parse(raw_credential) {
        Ok(c) => c,
        Err(e) => {
            error!("Account {}: {}", index + 1, e);
            report.fail(e);
            return report;
        }
    };
    report.username = Some(credential.username().to_string());

    let api = PitchtalkApi::new(transport, &credential);
    let session = match api.authenticate(&options.referral_code).await {
        Ok(s) => s,
        Err(e) => {
            error!("Auth error: {}", e);
            report.fail(e);
            return report;
        }
    };
    report.state = AccountState::Authenticated;

    let ip_label = report.ip.as_deref().unwrap_or("direct");
    info!(
        target: "account",
        "🎮 | Account: {} | Username: {} | 🌐 IP: {} | 🎮",
        index + 1,
        session.username,
        ip_label
    );
    info!(
        "💰 Coins: {}, 🎟️ Tickets: {}, 🔥 Login Streak: {}",
        session.coins, session.tickets, session.login_streak
    );

    report.state = if session.farming_id.is_some() {
        AccountState::FarmingActive
    } else {
        AccountState::FarmingAbsent
    };

    match advance_farming(&api, &session, options.rearm_farming, clock.now()).await {
        Ok(outcome) => {
            if let FarmingOutcome::Claimed {
                restarted: Some(Err(e)),
                ..
            } = &outcome
            {
                report.fail(e.clone());
            }
            if matches!(outcome, FarmingOutcome::Claimed { .. }) {
                report.state = AccountState::FarmingClaimable;
            }
            report.farming = Some(outcome);
        }
        Err(e) => {
            error!("Farming error: {}", e);
            report.fail(e);
        }
    }

    if options.tasks_enabled {
        report.state = AccountState::TasksPending;
        match run_tasks(&api, &session, &options.skipped_task_ids).await {
            Ok(tasks) => {
                report.failures.extend(tasks.failures.iter().cloned());
                report.tasks = Some(tasks);
            }
            Err(e) => {
                error!("Error getting tasks: {}", e);
                report.fail(e);
            }
        }
    }

    report.state = AccountState::Done;
    report
}
