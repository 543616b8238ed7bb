//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ADC, fan outputs, status sink, watchdog) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::control::ActuationLevel;

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: domain → ADC)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget conversion request.  The result comes back later
/// through the event bus as a sample event, never as a return value.
pub trait AnalogPort {
    fn start_conversion(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the fan.
pub trait ActuatorPort {
    /// Drive the outputs to `level`.  Must be idempotent and must not fail
    /// from the caller's point of view.
    fn apply(&mut self, level: ActuationLevel);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Watchdog port
// ───────────────────────────────────────────────────────────────

/// Liveness acknowledgement.  The device resets if this stops being called.
pub trait WatchdogPort {
    fn feed(&self);
}
