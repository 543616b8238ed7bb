//! Published temperature and the raw ADC temperature source.
//!
//! ## Publication contract
//!
//! [`TemperatureCell`] has exactly one writer (the sampler) and one reader
//! (the controller).  The value is 16 bits wide and is published with a
//! single atomic store, so the reader can never observe half of an update.
//! Zero means "nothing published yet".
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`TemperatureAdc`] reads the board's analog temperature
//! channel ([`TEMP_ADC_CHANNEL`](crate::pins::TEMP_ADC_CHANNEL)) via the
//! oneshot API (initialised by hw_init) and narrows it to 10 bits.  This
//! analog source stands in for a die sensor: it is what the calibration
//! and temperature offsets are tuned for.
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::{AtomicI16, AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

use super::{RAW_SAMPLE_MAX, RawSample};

/// Sentinel meaning no temperature has been published yet.
pub const UNINITIALISED: i16 = 0;

// ---------------------------------------------------------------------------
// TemperatureCell
// ---------------------------------------------------------------------------

/// Single-writer / single-reader cell holding the calibrated temperature.
#[derive(Debug)]
pub struct TemperatureCell {
    value: AtomicI16,
}

impl Default for TemperatureCell {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureCell {
    pub const fn new() -> Self {
        Self {
            value: AtomicI16::new(UNINITIALISED),
        }
    }

    /// Publish a new temperature.  Sampler only.
    pub fn publish(&self, temperature: i16) {
        self.value.store(temperature, Ordering::Release);
    }

    /// Latest published temperature (zero before the first sample).
    pub fn load(&self) -> i16 {
        self.value.load(Ordering::Acquire)
    }

    pub fn is_uninitialised(&self) -> bool {
        self.load() == UNINITIALISED
    }
}

// ---------------------------------------------------------------------------
// TemperatureAdc
// ---------------------------------------------------------------------------

static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(0);

/// Set the raw value returned by the simulated ADC (host builds).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: RawSample) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

/// Raw source for the temperature channel.
pub struct TemperatureAdc {
    _channel: u32,
}

impl TemperatureAdc {
    pub fn new(channel: u32) -> Self {
        Self { _channel: channel }
    }

    /// Run one conversion and return it as a 10-bit sample.
    pub fn convert(&self) -> RawSample {
        narrow_to_10_bit(self.read_adc())
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self._channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed) << ADC_EXTRA_BITS
    }
}

/// The SoC ADC resolves 12 bits; the control loop works on 10.
const ADC_EXTRA_BITS: u32 = 2;

fn narrow_to_10_bit(raw12: u16) -> RawSample {
    (raw12 >> ADC_EXTRA_BITS).min(RAW_SAMPLE_MAX)
}
