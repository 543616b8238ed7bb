//! Temperature sensing: raw ADC source, batch averaging, and the published
//! temperature shared between the sampler and the controller.
//!
//! ```text
//!  TemperatureAdc ──raw──▶ EventBus.sample ──▶ Sampler ──▶ TemperatureCell ──▶ Controller
//!   (one conversion          (single slot)     (20-sample     (atomic i16)
//!    per tick)                                  average)
//! ```

pub mod sampler;
pub mod temperature;

pub use sampler::Sampler;
pub use temperature::{TemperatureAdc, TemperatureCell};

/// One 10-bit ADC reading (0 – 1023).
pub type RawSample = u16;

/// Full-scale value of a raw sample.
pub const RAW_SAMPLE_MAX: RawSample = 1023;
