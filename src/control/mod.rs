//! Actuation policies: turning a temperature into a fan output level.
//!
//! The control loop is shared by both hardware variants; only the mapping
//! from temperature to output differs.  That mapping lives behind
//! [`ActuationPolicy`], with one implementation per variant:
//!
//! | Policy        | Output            | Curve                                  |
//! |---------------|-------------------|----------------------------------------|
//! | [`LinearDuty`]| 8-bit PWM duty    | linear from `min_duty` at low to 100 % |
//! | [`TwoStage`]  | half / full pins  | full at high, half below high − band   |
//!
//! [`Policy`] selects between them without dynamic dispatch.

pub mod linear;
pub mod two_stage;

pub use linear::LinearDuty;
pub use two_stage::TwoStage;

use crate::config::{ActuationKind, FanConfig};
use crate::fsm::StateId;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Discrete speed stages of the two-output fan driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanStage {
    Stopped,
    Half,
    Full,
}

/// The output the controller wants applied to the fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationLevel {
    /// Kick-start override: output driven fully on, regulation bypassed.
    Forced,
    /// Regulated PWM duty, 0–255.
    Duty(u8),
    /// Two-stage output.
    Stage(FanStage),
}

impl ActuationLevel {
    /// Output expressed as a percentage, for status reports.
    pub fn percent(self) -> u8 {
        match self {
            Self::Forced | Self::Stage(FanStage::Full) => 100,
            Self::Stage(FanStage::Half) => 50,
            Self::Stage(FanStage::Stopped) => 0,
            Self::Duty(d) => (u16::from(d) * 100 / 255) as u8,
        }
    }

    /// True when the output drives the fan at all.
    pub fn is_running(self) -> bool {
        !matches!(self, Self::Duty(0) | Self::Stage(FanStage::Stopped))
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Temperature thresholds on the calibrated reading scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Below this the fan stops.
    pub low: i16,
    /// At or above this the fan runs at full power.
    pub high: i16,
    /// Margin applied on every re-entry edge.
    pub hysteresis: i16,
}

impl Thresholds {
    /// OFF is left only strictly above this reading.
    pub fn restart_above(&self) -> i16 {
        self.low.saturating_add(self.hysteresis)
    }

    /// Two-stage output drops from full to half strictly below this reading.
    pub fn full_release_below(&self) -> i16 {
        self.high.saturating_sub(self.hysteresis)
    }
}

// ---------------------------------------------------------------------------
// Policy trait
// ---------------------------------------------------------------------------

/// Strategy mapping controller state and temperature to an output level.
pub trait ActuationPolicy {
    /// Output used while the fan is being kick-started.
    fn kick(&self) -> ActuationLevel;

    /// Output used while the fan is off.
    fn stopped(&self) -> ActuationLevel;

    /// Output to hand over to regulation once the spin-up dwell ends.
    fn spun_up(&self, current: ActuationLevel) -> ActuationLevel;

    /// Regulated output for a temperature at or above the low threshold.
    fn regulate(&self, temperature: i16, current: ActuationLevel) -> ActuationLevel;

    /// Thresholds this policy regulates against.
    fn thresholds(&self) -> Thresholds;

    /// Output for `state` at `temperature`, given the currently applied level.
    fn decide(&self, state: StateId, temperature: i16, current: ActuationLevel) -> ActuationLevel {
        match state {
            StateId::Startup | StateId::FullSpeed => self.kick(),
            StateId::Off => self.stopped(),
            StateId::Running => {
                if temperature < self.thresholds().low {
                    self.stopped()
                } else {
                    self.regulate(temperature, current)
                }
            }
        }
    }
}

/// Build-time selection of the actuation strategy.
#[derive(Debug, Clone, Copy)]
pub enum Policy {
    Linear(LinearDuty),
    TwoStage(TwoStage),
}

impl Policy {
    pub fn from_config(config: &FanConfig) -> Self {
        match config.actuation {
            ActuationKind::LinearDuty => Self::Linear(LinearDuty::from_config(config)),
            ActuationKind::TwoStage => Self::TwoStage(TwoStage::new(config.thresholds())),
        }
    }

    pub fn kind(&self) -> ActuationKind {
        match self {
            Self::Linear(_) => ActuationKind::LinearDuty,
            Self::TwoStage(_) => ActuationKind::TwoStage,
        }
    }
}

impl ActuationPolicy for Policy {
    fn kick(&self) -> ActuationLevel {
        match self {
            Self::Linear(p) => p.kick(),
            Self::TwoStage(p) => p.kick(),
        }
    }

    fn stopped(&self) -> ActuationLevel {
        match self {
            Self::Linear(p) => p.stopped(),
            Self::TwoStage(p) => p.stopped(),
        }
    }

    fn spun_up(&self, current: ActuationLevel) -> ActuationLevel {
        match self {
            Self::Linear(p) => p.spun_up(current),
            Self::TwoStage(p) => p.spun_up(current),
        }
    }

    fn regulate(&self, temperature: i16, current: ActuationLevel) -> ActuationLevel {
        match self {
            Self::Linear(p) => p.regulate(temperature, current),
            Self::TwoStage(p) => p.regulate(temperature, current),
        }
    }

    fn thresholds(&self) -> Thresholds {
        match self {
            Self::Linear(p) => p.thresholds(),
            Self::TwoStage(p) => p.thresholds(),
        }
    }
}
