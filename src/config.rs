//! Controller configuration parameters
//!
//! All tunable constants of the fan controller.  The firmware has no
//! configuration storage: the values are fixed at build time through
//! [`FanConfig::default`], and [`FanConfig::validate`] is checked once at boot.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::control::Thresholds;
use crate::error::{Error, Result};

/// Largest batch that cannot overflow the 16-bit accumulator with 10-bit samples.
pub const MAX_SAMPLES_PER_BATCH: u8 = 64;

/// Which actuator variant the firmware drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuationKind {
    /// Continuously variable 8-bit PWM duty cycle.
    LinearDuty,
    /// Two digital outputs: half speed and full speed.
    TwoStage,
}

/// Core controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanConfig {
    // --- Calibration ---
    /// Signed offset added to every averaged ADC reading.
    pub calibration_offset: i16,
    /// Calibrated reading that corresponds to 0 °C (about one count per degree).
    pub temperature_offset: i16,

    // --- Thresholds ---
    /// Below this temperature (°C) the fan is switched off.
    pub low_threshold_c: i16,
    /// At or above this temperature (°C) the fan runs at full power.
    pub high_threshold_c: i16,
    /// Margin (calibrated units) applied on every re-entry edge.
    pub hysteresis: i16,

    // --- Duty curve ---
    /// Lowest duty (percent) once the fan is regulated.
    pub min_duty_percent: u8,
    /// Duty percent gained per calibrated unit above the low threshold.
    pub duty_slope: u8,

    // --- Timing ---
    /// Forced full-power dwell after a start, in ticks (leaves on tick N + 1).
    pub spinup_ticks: u8,
    /// Samples averaged into one published temperature.
    pub samples_per_batch: u8,
    /// Control tick period (milliseconds).
    pub tick_period_ms: u32,
    /// Status report cadence, in ticks.
    pub report_interval_ticks: u8,
    /// Watchdog timeout (milliseconds).
    pub watchdog_timeout_ms: u32,

    // --- Output ---
    pub actuation: ActuationKind,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            // ADC 301 reads as 298 = 25 °C
            calibration_offset: -3,
            temperature_offset: 273,

            low_threshold_c: 25,
            high_threshold_c: 55,
            hysteresis: 2,

            min_duty_percent: 40,
            duty_slope: 2,

            spinup_ticks: 32,            // ~1.1 s of kick-start
            samples_per_batch: 20,       // one temperature every ~660 ms
            tick_period_ms: 33,          // timer overflow cadence
            report_interval_ticks: 32,   // ~1 s
            watchdog_timeout_ms: 2_000,

            actuation: ActuationKind::LinearDuty,
        }
    }
}

impl FanConfig {
    /// Convert a temperature in °C to the calibrated reading scale.
    pub fn celsius_to_reading(&self, celsius: i16) -> i16 {
        self.temperature_offset.saturating_add(celsius)
    }

    /// Convert a calibrated reading back to °C.
    pub fn reading_to_celsius(&self, reading: i16) -> i16 {
        reading.saturating_sub(self.temperature_offset)
    }

    /// Thresholds on the calibrated reading scale.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            low: self.celsius_to_reading(self.low_threshold_c),
            high: self.celsius_to_reading(self.high_threshold_c),
            hysteresis: self.hysteresis,
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_period_ms))
    }

    /// Duration of one report period in milliseconds.
    pub fn report_period_ms(&self) -> u64 {
        u64::from(self.tick_period_ms) * u64::from(self.report_interval_ticks)
    }

    /// Reject parameter sets the control loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.low_threshold_c >= self.high_threshold_c {
            return Err(Error::Config("low threshold must be below high threshold"));
        }
        if self.hysteresis < 0 {
            return Err(Error::Config("hysteresis must not be negative"));
        }
        self.checked_edges()
            .ok_or(Error::Config("thresholds overflow the reading scale"))?;
        if self.min_duty_percent > 100 {
            return Err(Error::Config("minimum duty above 100%"));
        }
        if self.samples_per_batch == 0 || self.samples_per_batch > MAX_SAMPLES_PER_BATCH {
            return Err(Error::Config("samples per batch must be 1..=64"));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick period must be non-zero"));
        }
        if self.report_interval_ticks == 0 {
            return Err(Error::Config("report interval must be non-zero"));
        }
        if u64::from(self.watchdog_timeout_ms) <= self.report_period_ms() {
            return Err(Error::Config(
                "watchdog timeout must exceed one report period",
            ));
        }
        Ok(())
    }

    /// Every threshold edge on the reading scale, or `None` if one overflows.
    fn checked_edges(&self) -> Option<[i16; 4]> {
        let low = self.temperature_offset.checked_add(self.low_threshold_c)?;
        let high = self.temperature_offset.checked_add(self.high_threshold_c)?;
        Some([
            low,
            high,
            low.checked_add(self.hysteresis)?,
            high.checked_sub(self.hysteresis)?,
        ])
    }
}
