//! GPIO / peripheral pin assignments for the fan controller board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  `main` takes the matching typed pins from
//! `Peripherals`; keep the two in step when rewiring.

// ---------------------------------------------------------------------------
// Fan output, PWM variant (logic-level MOSFET on the fan supply)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the fan MOSFET gate.
pub const FAN_PWM_GPIO: i32 = 1;
/// PWM carrier frequency.  Above audible range for typical 12 V fans.
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;

// ---------------------------------------------------------------------------
// Fan output, two-stage variant (relay / transistor pair)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = half-speed winding energised.
pub const FAN_HALF_GPIO: i32 = 2;
/// Digital output: HIGH = full-speed winding energised.
pub const FAN_FULL_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Temperature sensor (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 4 (GPIO 5 on ESP32-S3), wired to the board's temperature
/// divider.
///
/// The ESP32-S3 die sensor only reports through the `temperature_sensor`
/// driver as a converted °C value, so there is no raw count to average and
/// calibrate.  The board therefore brings the sensor out as an analog
/// voltage on ADC1, which gives the roughly one-count-per-degree reading
/// the control loop is calibrated against.
pub const TEMP_ADC_CHANNEL: u32 = 4;
