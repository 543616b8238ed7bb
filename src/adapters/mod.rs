//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | AnalogPort         | ESP32 ADC1 → EventBus    |
//! |                | ActuatorPort       | PWM fan / two-stage fan  |
//! | `log_sink`     | EventSink          | Serial log output        |
//!
//! The watchdog port is implemented directly by
//! [`drivers::watchdog::Watchdog`](crate::drivers::watchdog::Watchdog).

pub mod hardware;
pub mod log_sink;
