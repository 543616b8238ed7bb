//! Linear PWM duty curve.
//!
//! The reading is roughly one count per degree.  Between the low and high
//! thresholds the duty rises from `min_duty` percent by `slope` percent per
//! count, so with the defaults (40 %, ×2) a 30-count span covers
//! 40 %..100 %.  The percentage is then rescaled to the 8-bit output.

use super::{ActuationLevel, ActuationPolicy, Thresholds};
use crate::config::FanConfig;

const DUTY_MAX: u8 = 255;

#[derive(Debug, Clone, Copy)]
pub struct LinearDuty {
    thresholds: Thresholds,
    min_duty_percent: u8,
    slope: u8,
}

impl LinearDuty {
    pub fn new(thresholds: Thresholds, min_duty_percent: u8, slope: u8) -> Self {
        Self {
            thresholds,
            min_duty_percent: min_duty_percent.min(100),
            slope,
        }
    }

    pub fn from_config(config: &FanConfig) -> Self {
        Self::new(
            config.thresholds(),
            config.min_duty_percent,
            config.duty_slope,
        )
    }

    /// Duty percentage for a reading at or above the low threshold.
    pub fn duty_percent(&self, temperature: i16) -> u8 {
        if temperature >= self.thresholds.high {
            return 100;
        }
        let above = i32::from(temperature) - i32::from(self.thresholds.low);
        let percent = above.max(0) * i32::from(self.slope) + i32::from(self.min_duty_percent);
        percent.min(100) as u8
    }

    /// Rescale a percentage to the 8-bit PWM range.
    pub fn percent_to_duty(percent: u8) -> u8 {
        (u16::from(percent.min(100)) * u16::from(DUTY_MAX) / 100) as u8
    }
}

impl ActuationPolicy for LinearDuty {
    fn kick(&self) -> ActuationLevel {
        ActuationLevel::Forced
    }

    fn stopped(&self) -> ActuationLevel {
        ActuationLevel::Duty(0)
    }

    /// PWM path reconnected with the output still fully high.
    fn spun_up(&self, _current: ActuationLevel) -> ActuationLevel {
        ActuationLevel::Duty(DUTY_MAX)
    }

    fn regulate(&self, temperature: i16, _current: ActuationLevel) -> ActuationLevel {
        ActuationLevel::Duty(Self::percent_to_duty(self.duty_percent(temperature)))
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}
