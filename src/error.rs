//! Unified error types for the fan controller firmware.
//!
//! The control loop itself has no error paths: every sample and every state
//! has a defined outcome.  [`Error`] covers boot (configuration, peripheral
//! bring-up).  Actuator drivers record an [`ActuatorError`] and log it; a
//! failed output write never stops the loop.  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is inconsistent.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Stage output pin write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
