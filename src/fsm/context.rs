//! Shared mutable context threaded through every FSM handler.
//!
//! `ControllerContext` is the blackboard the state handlers read from and
//! write to: the temperature snapshot taken for this tick, the output level
//! the handlers want applied, the time spent in the current state, and the
//! actuation policy.

use crate::config::FanConfig;
use crate::control::{ActuationLevel, ActuationPolicy, Policy};

/// The shared context passed to every state handler function.
pub struct ControllerContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.  Maintained by the
    /// engine; FULLSPEED measures its kick-start dwell with it.
    pub ticks_in_state: u32,

    // -- Sensor data --
    /// Temperature read once at the start of the tick.
    pub temperature: i16,

    // -- Output --
    /// Level to apply to the fan after the FSM tick.
    pub level: ActuationLevel,

    // -- Configuration --
    pub config: FanConfig,
    pub policy: Policy,
}

impl ControllerContext {
    /// Create a new context with the fan stopped.
    pub fn new(config: FanConfig) -> Self {
        let policy = Policy::from_config(&config);
        Self {
            ticks_in_state: 0,
            temperature: 0,
            level: policy.stopped(),
            config,
            policy,
        }
    }

    /// Temperature expressed in °C.
    pub fn temperature_c(&self) -> i16 {
        self.config.reading_to_celsius(self.temperature)
    }
}
