//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use core::fmt::{self, Write as _};

use crate::control::ActuationLevel;
use crate::fsm::StateId;

/// Capacity of a formatted status line.
pub const STATUS_LINE_CAP: usize = 64;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Periodic status report.
    Status(StatusSnapshot),
}

/// A point-in-time status snapshot, taken on report ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Published (calibrated) temperature.
    pub temperature: i16,
    pub calibration_offset: i16,
    pub temperature_offset: i16,
    pub level: ActuationLevel,
    pub state: StateId,
    /// Selects the `FAN:` label instead of `PWM:`.
    pub two_stage: bool,
}

impl StatusSnapshot {
    /// Temperature before calibration, as the ADC delivered it.
    pub fn raw(&self) -> i16 {
        self.temperature.wrapping_sub(self.calibration_offset)
    }

    pub fn celsius(&self) -> i16 {
        self.temperature.wrapping_sub(self.temperature_offset)
    }

    /// Render the fixed-format status line without allocating.
    pub fn status_line(&self) -> heapless::String<STATUS_LINE_CAP> {
        let mut line = heapless::String::new();
        // Worst case is well under the capacity; a failed write only truncates.
        let _ = write!(line, "{self}");
        line
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.two_stage { "FAN" } else { "PWM" };
        write!(
            f,
            "ADC:{} ADJ:{} T:{} {}:{} ST:{}",
            self.raw(),
            self.temperature,
            self.celsius(),
            label,
            self.level.percent(),
            self.state as u8
        )
    }
}
