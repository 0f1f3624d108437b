//! Cycle driver: every account, one at a time, once per cycle.

use crate::session::{run_account, AccountReport, Clock, SessionOptions, SystemClock};
use crate::transport::Transport;
use anyhow::{ensure, Result};
use async_trait::async_trait;
use core_logic::{AccountManager, CycleJob, CycleStats};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const BANNER: &str = r#"
    ╔══════════════════════════════════════════════╗
    ║   ___ _ _       _   _____     _ _            ║
    ║  | _ (_) |_ __ | |_|_   _|_ _| | |__         ║
    ║  |  _/ |  _/ _|| ' \ | |/ _` | | / /         ║
    ║  |_| |_|\__\__||_||_||_|\__,_|_|_\_\         ║
    ║                                              ║
    ║        farming + tasks, every 6 hours        ║
    ╚══════════════════════════════════════════════╝
"#;

pub fn print_banner() {
    println!("{}", BANNER);
}

/// Owns the account list and each account's bound transport.
pub struct FarmingDriver {
    accounts: AccountManager,
    transports: Vec<Box<dyn Transport>>,
    options: SessionOptions,
    clock: Box<dyn Clock>,
    show_banner: bool,
}

impl FarmingDriver {
    /// `transports[i]` serves `accounts[i]` for the life of the driver.
    pub fn new(
        accounts: AccountManager,
        transports: Vec<Box<dyn Transport>>,
        options: SessionOptions,
    ) -> Result<Self> {
        ensure!(
            accounts.len() == transports.len(),
            "{} accounts but {} transports",
            accounts.len(),
            transports.len()
        );
        Ok(Self {
            accounts,
            transports,
            options,
            clock: Box::new(SystemClock),
            show_banner: true,
        })
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Runs every account once and returns the per-account reports.
    pub async fn run_pass(&self, token: &CancellationToken) -> Vec<AccountReport> {
        let mut reports = Vec::with_capacity(self.accounts.len());

        for (index, (raw, transport)) in self.accounts.iter().zip(&self.transports).enumerate() {
            if token.is_cancelled() {
                warn!("Cancelled before account {}", index + 1);
                break;
            }
            let report = run_account(
                transport.as_ref(),
                index,
                raw,
                &self.options,
                self.clock.as_ref(),
            )
            .await;
            reports.push(report);
        }

        reports
    }
}

pub fn tally(reports: &[AccountReport]) -> CycleStats {
    let mut stats = CycleStats::default();
    for report in reports {
        if report.skipped {
            stats.skipped += 1;
        } else if report.is_success() {
            stats.success += 1;
        } else {
            stats.failed += 1;
        }
    }
    stats
}

#[async_trait]
impl CycleJob for FarmingDriver {
    fn name(&self) -> &str {
        "pitchtalk"
    }

    async fn run_cycle(&self, cycle: u64, token: &CancellationToken) -> Result<CycleStats> {
        if self.show_banner {
            print_banner();
        }
        info!("Cycle {}: processing {} accounts", cycle, self.accounts.len());

        let reports = self.run_pass(token).await;
        Ok(tally(&reports))
    }
}
