use std::io::Write;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Waits `seconds`, redrawing a single status line once per second.
///
/// Returns `false` when the token fired before the wait finished.
pub async fn countdown(seconds: u64, token: &CancellationToken) -> bool {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stdout = std::io::stdout();

    for remaining in (0..=seconds).rev() {
        tokio::select! {
            _ = token.cancelled() => {
                let _ = writeln!(stdout);
                return false;
            }
            _ = ticker.tick() => {}
        }
        let _ = write!(
            stdout,
            "\r===== Wait {} seconds to continue looping =====",
            remaining
        );
        let _ = stdout.flush();
    }

    // The last tick printed 0; hold it for a second like every other value.
    tokio::select! {
        _ = token.cancelled() => {
            let _ = writeln!(stdout);
            return false;
        }
        _ = ticker.tick() => {}
    }

    let _ = writeln!(stdout);
    true
}
