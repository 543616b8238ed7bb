//! Fan output drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod hw_timer;
pub mod pwm_fan;
pub mod two_stage_fan;
pub mod watchdog;

pub use pwm_fan::PwmFan;
pub use two_stage_fan::TwoStageFan;
