//! PWM fan driver (variant A).
//!
//! Drives the fan MOSFET through any `embedded-hal` 1.0 [`SetDutyCycle`]
//! channel; on ESP-IDF that is an LEDC channel.
//!
//! | Level              | Output                    |
//! |--------------------|---------------------------|
//! | `Forced`           | fully on (PWM bypassed)   |
//! | `Duty(d)`          | `d / 255`                 |
//! | `Stage(Stopped)`   | fully off                 |
//! | `Stage(Half)`      | 50 %                      |
//! | `Stage(Full)`      | fully on                  |
//!
//! Repeating the current level performs no write.  Write errors are logged
//! and the level is retried on the next `apply`.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::control::{ActuationLevel, FanStage};
use crate::error::ActuatorError;

pub struct PwmFan<P> {
    pwm: P,
    applied: Option<ActuationLevel>,
    last_error: Option<ActuatorError>,
}

impl<P: SetDutyCycle> PwmFan<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            applied: None,
            last_error: None,
        }
    }

    /// Level currently on the output, if any write has succeeded.
    pub fn applied(&self) -> Option<ActuationLevel> {
        self.applied
    }

    pub fn last_error(&self) -> Option<ActuatorError> {
        self.last_error
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }

    fn write(&mut self, level: ActuationLevel) -> Result<(), P::Error> {
        match level {
            ActuationLevel::Forced | ActuationLevel::Stage(FanStage::Full) => {
                self.pwm.set_duty_cycle_fully_on()
            }
            ActuationLevel::Stage(FanStage::Stopped) => self.pwm.set_duty_cycle_fully_off(),
            ActuationLevel::Stage(FanStage::Half) => self.pwm.set_duty_cycle_percent(50),
            ActuationLevel::Duty(d) => self.pwm.set_duty_cycle_fraction(u16::from(d), 255),
        }
    }
}

impl<P: SetDutyCycle> ActuatorPort for PwmFan<P> {
    fn apply(&mut self, level: ActuationLevel) {
        if self.applied == Some(level) {
            return;
        }
        match self.write(level) {
            Ok(()) => {
                self.applied = Some(level);
                self.last_error = None;
            }
            Err(e) => {
                warn!("PwmFan: {} for {:?} ({:?})", ActuatorError::PwmWriteFailed, level, e.kind());
                self.applied = None;
                self.last_error = Some(ActuatorError::PwmWriteFailed);
            }
        }
    }
}
