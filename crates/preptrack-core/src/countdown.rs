//! Per-question countdown.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Shortest average completion time used to size a countdown, in seconds.
pub const MIN_COUNTDOWN_BASE_SECS: f64 = 30.0;

/// Longest average completion time used to size a countdown, in seconds.
pub const MAX_COUNTDOWN_BASE_SECS: f64 = 24.0 * 60.0 * 60.0;

/// Multiplier applied to the average completion time.
pub const COUNTDOWN_SCALE: f64 = 1.5;

/// Time allowed for a question whose learners average `avg_completion_secs`.
///
/// The average is clamped to 30 seconds..24 hours, then scaled by 1.5.
pub fn countdown_for(avg_completion_secs: f64) -> Duration {
    let base = if avg_completion_secs.is_finite() {
        avg_completion_secs.clamp(MIN_COUNTDOWN_BASE_SECS, MAX_COUNTDOWN_BASE_SECS)
    } else {
        MIN_COUNTDOWN_BASE_SECS
    };
    Duration::from_secs_f64(base * COUNTDOWN_SCALE)
}

/// A running countdown backed by a timer task.
///
/// Dropping the countdown aborts the task, so a countdown owned by a view
/// never fires after that view is gone.
pub struct Countdown {
    deadline: Instant,
    fired: oneshot::Receiver<()>,
    expired: bool,
    task: JoinHandle<()>,
}

impl Countdown {
    pub fn start(duration: Duration) -> Self {
        let deadline = Instant::now() + duration;
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(());
        });
        Self {
            deadline,
            fired: rx,
            expired: false,
            task,
        }
    }

    /// Time left before expiry, zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&mut self) -> bool {
        if !self.expired && self.fired.try_recv().is_ok() {
            self.expired = true;
        }
        self.expired
    }

    /// Wait until the countdown elapses. Returns immediately if it already has.
    pub async fn expired(&mut self) {
        if self.expired {
            return;
        }
        let _ = (&mut self.fired).await;
        self.expired = true;
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
