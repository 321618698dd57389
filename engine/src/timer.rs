//! Cancellable repeating timer driven by a caller-supplied clock.
//!
//! The timer never sleeps or spawns anything. The event loop asks it which ticks are due and
//! feeds them into the same queue as input, so ticks and commands stay strictly ordered and a
//! cancelled timer can never fire into discarded state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingTimer {
    #[serde(with = "crate::serde_duration")]
    interval: Duration,
    #[serde(with = "crate::serde_duration::option")]
    next_due: Option<Duration>,
}

impl RepeatingTimer {
    /// Creates a stopped timer. Intervals below 1ms are raised to 1ms.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time of the next pending tick, if the timer is running.
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// (Re)starts the timer; the first tick is due one interval after `now`.
    pub fn start(&mut self, now: Duration) {
        self.next_due = Some(now.saturating_add(self.interval));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns the timestamp of the oldest tick due at `now` and schedules the following one.
    ///
    /// Call in a loop to drain every overdue tick in order.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let due = self.next_due?;
        if now < due {
            return None;
        }
        self.next_due = Some(due.saturating_add(self.interval));
        Some(due)
    }
}
