//! # Interval Scheduler Module
//!
//! Enforces a fixed minimum elapsed time between firings.
//!
//! The scheduler keeps one monotonic last-fired timestamp. A check fires
//! when at least one period has elapsed and re-bases the timestamp at the
//! check's `now` rather than on a fixed grid: jitter from a late check does
//! not accumulate into drift, and a scheduler that falls several periods
//! behind fires once instead of bursting to catch up. Freshness over
//! completeness.

use std::time::{Duration, Instant};

/// Fixed-cadence, at-most-once-per-check scheduler.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use ground_link::scheduler::IntervalScheduler;
///
/// let start = Instant::now();
/// let mut scheduler = IntervalScheduler::starting_at(Duration::from_millis(20), start);
///
/// assert!(!scheduler.should_fire(start + Duration::from_millis(19)));
/// assert!(scheduler.should_fire(start + Duration::from_millis(20)));
/// // Just fired: the next period is measured from the firing check
/// assert!(!scheduler.should_fire(start + Duration::from_millis(21)));
/// ```
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    period: Duration,
    last_fired: Instant,
}

impl IntervalScheduler {
    /// Creates a scheduler whose first firing is one period from now.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    /// Creates a scheduler with an explicit epoch, for deterministic tests.
    #[must_use]
    pub fn starting_at(period: Duration, now: Instant) -> Self {
        Self {
            period,
            last_fired: now,
        }
    }

    /// Returns the configured period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Checks whether the period has elapsed at `now`, firing if so.
    ///
    /// Fires at most once per call regardless of how many periods have
    /// elapsed, and resets the timestamp to `now` on firing. Timestamps
    /// only move forward; a `now` earlier than the last firing is treated
    /// as zero elapsed time.
    pub fn should_fire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_fired) >= self.period {
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}
