//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full output
//! history without touching real GPIO/PWM registers.  When linked to an
//! [`EventBus`], each conversion request delivers the configured raw value
//! back through the bus, like the ADC completion path does on hardware.

use std::cell::Cell;

use fanctl::app::events::AppEvent;
use fanctl::app::ports::{ActuatorPort, AnalogPort, EventSink, WatchdogPort};
use fanctl::control::ActuationLevel;
use fanctl::events::EventBus;
use fanctl::sensors::RawSample;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware<'a> {
    pub applied: Vec<ActuationLevel>,
    pub conversions: usize,
    pub adc_value: RawSample,
    bus: Option<&'a EventBus>,
}

#[allow(dead_code)]
impl<'a> MockHardware<'a> {
    pub fn new() -> Self {
        Self {
            applied: Vec::new(),
            conversions: 0,
            adc_value: 0,
            bus: None,
        }
    }

    /// Deliver conversion results through `bus`.
    pub fn on_bus(bus: &'a EventBus, adc_value: RawSample) -> Self {
        Self {
            adc_value,
            bus: Some(bus),
            ..Self::new()
        }
    }

    pub fn last_level(&self) -> Option<ActuationLevel> {
        self.applied.last().copied()
    }
}

impl Default for MockHardware<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogPort for MockHardware<'_> {
    fn start_conversion(&mut self) {
        self.conversions += 1;
        if let Some(bus) = self.bus {
            bus.conversion_complete(self.adc_value);
        }
    }
}

impl ActuatorPort for MockHardware<'_> {
    fn apply(&mut self, level: ActuationLevel) {
        self.applied.push(level);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(s) => Some(s.status_line().as_str().to_owned()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockWatchdog ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockWatchdog {
    pub feeds: Cell<u32>,
}

impl WatchdogPort for MockWatchdog {
    fn feed(&self) {
        self.feeds.set(self.feeds.get() + 1);
    }
}
