//! Per-turn countdown driven by tokio time

use std::time::Duration;

use skirmish_battle::Clock;
use tokio::time::{Instant, sleep_until};

/// What the timer reports next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The warning lead was reached; `remaining` is left on the clock
    Warning { remaining: Duration },
    /// The budget ran out
    Expired,
}

/// Countdown for one turn.
///
/// `next_event` is cancel-safe: dropping it before it completes loses
/// nothing, so it can sit in a `select!` alongside a command channel.
#[derive(Debug, Clone)]
pub struct TurnTimer {
    deadline: Instant,
    warn_at: Option<Instant>,
    expired: bool,
}

impl TurnTimer {
    /// Start counting now. No warning fires when the lead is not shorter
    /// than the budget.
    pub fn start(budget: Duration, warning_lead: Duration) -> Self {
        let now = Instant::now();
        let warn_at = (!warning_lead.is_zero() && warning_lead < budget)
            .then(|| now + (budget - warning_lead));

        Self {
            deadline: now + budget,
            warn_at,
            expired: false,
        }
    }

    /// Time left before expiry
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Wait for the next warning or expiry. Once expired, never completes.
    pub async fn next_event(&mut self) -> TimerEvent {
        if let Some(warn_at) = self.warn_at {
            sleep_until(warn_at).await;
            self.warn_at = None;
            return TimerEvent::Warning {
                remaining: self.remaining(),
            };
        }

        if self.expired {
            std::future::pending::<()>().await;
        }

        sleep_until(self.deadline).await;
        self.expired = true;
        TimerEvent::Expired
    }
}

/// Session clock that follows tokio time, so paused-time tests and the
/// session agree on elapsed milliseconds
#[derive(Debug)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
