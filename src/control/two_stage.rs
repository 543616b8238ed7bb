//! Two-stage (half / full speed) output.
//!
//! Full speed is asserted at or above the high threshold and held until the
//! reading falls below `high - hysteresis`.  Inside that band the current
//! stage is kept, so a reading wobbling by one count at the boundary does
//! not toggle the outputs.

use super::{ActuationLevel, ActuationPolicy, FanStage, Thresholds};

#[derive(Debug, Clone, Copy)]
pub struct TwoStage {
    thresholds: Thresholds,
}

impl TwoStage {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl ActuationPolicy for TwoStage {
    fn kick(&self) -> ActuationLevel {
        ActuationLevel::Stage(FanStage::Full)
    }

    fn stopped(&self) -> ActuationLevel {
        ActuationLevel::Stage(FanStage::Stopped)
    }

    /// Full speed stays asserted; regulation takes over on the next tick.
    fn spun_up(&self, current: ActuationLevel) -> ActuationLevel {
        match current {
            ActuationLevel::Stage(_) => current,
            _ => self.kick(),
        }
    }

    fn regulate(&self, temperature: i16, current: ActuationLevel) -> ActuationLevel {
        if temperature >= self.thresholds.high {
            return ActuationLevel::Stage(FanStage::Full);
        }
        if temperature < self.thresholds.full_release_below() {
            return ActuationLevel::Stage(FanStage::Half);
        }
        match current {
            ActuationLevel::Stage(FanStage::Full) | ActuationLevel::Forced => {
                ActuationLevel::Stage(FanStage::Full)
            }
            _ => ActuationLevel::Stage(FanStage::Half),
        }
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}
