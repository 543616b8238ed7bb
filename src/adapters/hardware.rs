//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the temperature ADC and the fan driver, exposing them through
//! [`AnalogPort`] and [`ActuatorPort`].  Conversion results are delivered
//! through the event bus, never returned to the caller.  On non-espidf
//! targets the ADC reads a simulated value.

use crate::app::ports::{ActuatorPort, AnalogPort};
use crate::control::ActuationLevel;
use crate::events::EventBus;
use crate::sensors::TemperatureAdc;

/// Concrete adapter combining the ADC and one fan driver.
pub struct HardwareAdapter<'a, F> {
    adc: TemperatureAdc,
    fan: F,
    bus: &'a EventBus,
}

impl<'a, F: ActuatorPort> HardwareAdapter<'a, F> {
    pub fn new(adc: TemperatureAdc, fan: F, bus: &'a EventBus) -> Self {
        Self { adc, fan, bus }
    }

    #[cfg(test)]
    fn fan(&self) -> &F {
        &self.fan
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl<F> AnalogPort for HardwareAdapter<'_, F> {
    fn start_conversion(&mut self) {
        let raw = self.adc.convert();
        self.bus.conversion_complete(raw);
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<F: ActuatorPort> ActuatorPort for HardwareAdapter<'_, F> {
    fn apply(&mut self, level: ActuationLevel) {
        self.fan.apply(level);
    }
}
