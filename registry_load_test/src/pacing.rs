//! Constant throughput pacing.
//!
//! Each simulated user aims for a fixed number of iterations per second:
//! after an iteration it waits for whatever is left of the period
//! `1 / rate`. An iteration that overruns the period is followed
//! immediately by the next one; missed periods are not made up.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantThroughput {
    period: Duration,
}

impl ConstantThroughput {
    /// `None` unless `rate` is a finite positive number of iterations per second
    pub fn new(rate: f64) -> Option<Self> {
        if !(rate.is_finite() && rate > 0.0) {
            return None;
        }
        let period = Duration::try_from_secs_f64(1.0 / rate).ok()?;
        Some(Self { period })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// How long to wait after an iteration that took `iteration_elapsed`
    pub fn wait_time(&self, iteration_elapsed: Duration) -> Duration {
        self.period.saturating_sub(iteration_elapsed)
    }
}
