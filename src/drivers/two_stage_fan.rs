//! Two-stage fan driver (variant B).
//!
//! Two digital outputs select half or full speed.  At most one of them is
//! ever high: the output being released is always cleared before the other
//! is set, and if clearing fails the other output is left alone.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` 1.0 [`OutputPin`]; on ESP-IDF these are
//! `PinDriver`s, on host they are test doubles.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::control::{ActuationLevel, FanStage};
use crate::error::ActuatorError;

/// Stage the outputs will show for a given level.
pub fn stage_for(level: ActuationLevel) -> FanStage {
    match level {
        ActuationLevel::Stage(stage) => stage,
        ActuationLevel::Forced | ActuationLevel::Duty(255) => FanStage::Full,
        ActuationLevel::Duty(0) => FanStage::Stopped,
        ActuationLevel::Duty(_) => FanStage::Half,
    }
}

pub struct TwoStageFan<H, F> {
    half: H,
    full: F,
    applied: Option<FanStage>,
    last_error: Option<ActuatorError>,
}

impl<H: OutputPin, F: OutputPin> TwoStageFan<H, F> {
    /// Take ownership of both outputs and drive them low.
    pub fn new(half: H, full: F) -> Self {
        let mut fan = Self {
            half,
            full,
            applied: None,
            last_error: None,
        };
        fan.apply(ActuationLevel::Stage(FanStage::Stopped));
        fan
    }

    /// Stage currently on the outputs, if the last write succeeded.
    pub fn applied(&self) -> Option<FanStage> {
        self.applied
    }

    pub fn last_error(&self) -> Option<ActuatorError> {
        self.last_error
    }

    fn drive(&mut self, stage: FanStage) -> Result<(), ActuatorError> {
        match stage {
            FanStage::Stopped => {
                self.full.set_low().map_err(|e| log_pin("full", e.kind()))?;
                self.half.set_low().map_err(|e| log_pin("half", e.kind()))?;
            }
            FanStage::Half => {
                self.full.set_low().map_err(|e| log_pin("full", e.kind()))?;
                self.half.set_high().map_err(|e| log_pin("half", e.kind()))?;
            }
            FanStage::Full => {
                self.half.set_low().map_err(|e| log_pin("half", e.kind()))?;
                self.full.set_high().map_err(|e| log_pin("full", e.kind()))?;
            }
        }
        Ok(())
    }
}

fn log_pin(which: &str, kind: embedded_hal::digital::ErrorKind) -> ActuatorError {
    warn!("TwoStageFan: {} on {} output ({:?})", ActuatorError::GpioWriteFailed, which, kind);
    ActuatorError::GpioWriteFailed
}

impl<H: OutputPin, F: OutputPin> ActuatorPort for TwoStageFan<H, F> {
    fn apply(&mut self, level: ActuationLevel) {
        let stage = stage_for(level);
        if self.applied == Some(stage) {
            return;
        }
        match self.drive(stage) {
            Ok(()) => {
                self.applied = Some(stage);
                self.last_error = None;
            }
            Err(e) => {
                self.applied = None;
                self.last_error = Some(e);
            }
        }
    }
}
