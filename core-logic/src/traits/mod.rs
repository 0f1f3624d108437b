use anyhow::Result;
use async_trait::async_trait;
use std::ops::AddAssign;

/// Per-cycle account tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Accounts that authenticated and ran their steps
    pub success: u64,
    /// Accounts whose authentication or a step failed
    pub failed: u64,
    /// Accounts never attempted (e.g. proxy check failed)
    pub skipped: u64,
}

impl CycleStats {
    pub fn total(&self) -> u64 {
        self.success + self.failed + self.skipped
    }
}

impl AddAssign for CycleStats {
    fn add_assign(&mut self, rhs: Self) {
        self.success += rhs.success;
        self.failed += rhs.failed;
        self.skipped += rhs.skipped;
    }
}

#[async_trait]
pub trait CycleJob: Send + Sync {
    /// Label used in log lines
    fn name(&self) -> &str;

    /// Runs one full pass over every account.
    ///
    /// Per-account failures belong in the returned stats. An `Err` here is
    /// fatal and stops the runner.
    async fn run_cycle(
        &self,
        cycle: u64,
        cancellation_token: &tokio_util::sync::CancellationToken,
    ) -> Result<CycleStats>;
}
