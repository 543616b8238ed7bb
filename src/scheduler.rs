//! Report cadence scheduler.
//!
//! Runs alongside the controller on the same tick.  It never touches the
//! control state; it only decides which ticks carry a status report.
//!
//! ```text
//!  tick ──▶ ReportScheduler.tick() ──[every Nth]──▶ StatusSnapshot ──▶ EventBus.report
//! ```

use log::debug;

/// Counts control ticks and flags every `interval`-th one as a report tick.
#[derive(Debug, Clone)]
pub struct ReportScheduler {
    /// Ticks per report (≥ 1).
    interval: u8,
    /// Ticks since the last report, always below `interval` between calls.
    elapsed: u8,
}

impl ReportScheduler {
    pub fn new(interval: u8) -> Self {
        Self {
            interval: interval.max(1),
            elapsed: 0,
        }
    }

    /// Advance by one tick.  Returns `true` when this tick is a report tick.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = 0;
        debug!("Scheduler: report due");
        true
    }

    /// Ticks remaining until the next report.
    #[cfg(test)]
    fn ticks_until_report(&self) -> u8 {
        self.interval - self.elapsed
    }
}
