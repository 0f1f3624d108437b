use crate::error::CoreError;
use crate::traits::{CycleJob, CycleStats};
use crate::utils::timer::countdown;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

/// Drives a [`CycleJob`]: run a cycle, wait, repeat.
pub struct CycleRunner {
    wait_secs: u64,
    max_cycles: Option<u64>,
    token: CancellationToken,
}

impl CycleRunner {
    pub fn new(wait_secs: u64) -> Self {
        Self {
            wait_secs,
            max_cycles: None,
            token: CancellationToken::new(),
        }
    }

    /// Stop after `n` cycles instead of looping forever. The wait after the
    /// final cycle is skipped.
    pub fn with_max_cycles(mut self, n: u64) -> Self {
        self.max_cycles = Some(n);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Cancels the runner on Ctrl+C.
    pub fn with_ctrl_c(self) -> Self {
        let cloned_token = self.token.clone();
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("🛑 Received Ctrl+C. Initiating graceful shutdown...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });
        self
    }

    /// Returns the accumulated stats once cancelled or once `max_cycles`
    /// is reached. A job error ends the loop with [`CoreError::Cycle`].
    pub async fn run<J: CycleJob + ?Sized>(&self, job: &J) -> Result<CycleStats, CoreError> {
        let mut totals = CycleStats::default();
        let mut cycle: u64 = 0;

        loop {
            if self.token.is_cancelled() {
                break;
            }
            cycle += 1;

            let span = tracing::info_span!("cycle", job = job.name(), cycle);
            let stats = job
                .run_cycle(cycle, &self.token)
                .instrument(span)
                .await
                .map_err(|source| CoreError::Cycle { cycle, source })?;

            info!(
                "Cycle {} done | Success: {} | Failed: {} | Skipped: {}",
                cycle, stats.success, stats.failed, stats.skipped
            );
            totals += stats;

            if self.max_cycles.is_some_and(|max| cycle >= max) {
                break;
            }
            if !countdown(self.wait_secs, &self.token).await {
                break;
            }
        }

        info!("🛑 Shutdown Complete. Ran {} cycles.", cycle);
        Ok(totals)
    }
}
