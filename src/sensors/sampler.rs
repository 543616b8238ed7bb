//! Batch-averaging sampler.
//!
//! Raw readings are summed into a 16-bit accumulator.  Every
//! `samples_per_batch` readings the truncated mean plus the calibration
//! offset is published to the [`TemperatureCell`].  The very first reading
//! is published directly so the controller never runs on the zero sentinel
//! for a whole batch after boot.

use log::debug;

use super::RawSample;
use super::temperature::TemperatureCell;
use crate::config::FanConfig;

/// Running sum of raw samples.  `count` is always below the batch size
/// between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemperatureAccumulator {
    pub sum: u16,
    pub count: u8,
}

pub struct Sampler {
    acc: TemperatureAccumulator,
    batch: u8,
    calibration_offset: i16,
}

impl Sampler {
    pub fn new(config: &FanConfig) -> Self {
        Self {
            acc: TemperatureAccumulator::default(),
            batch: config.samples_per_batch.max(1),
            calibration_offset: config.calibration_offset,
        }
    }

    /// Fold one conversion result into the accumulator, publishing to
    /// `cell` on bootstrap and on every completed batch.
    pub fn record_sample(&mut self, raw: RawSample, cell: &TemperatureCell) {
        self.acc.sum = self.acc.sum.wrapping_add(raw);
        self.acc.count += 1;

        if cell.is_uninitialised() {
            cell.publish(self.calibrate(self.acc.sum));
        }

        if self.acc.count >= self.batch {
            let mean = self.acc.sum / u16::from(self.batch);
            let temperature = self.calibrate(mean);
            cell.publish(temperature);
            debug!("Sampler: batch mean {} -> temperature {}", mean, temperature);
            self.acc = TemperatureAccumulator::default();
        }
    }

    pub fn accumulator(&self) -> TemperatureAccumulator {
        self.acc
    }

    fn calibrate(&self, value: u16) -> i16 {
        (value as i16).wrapping_add(self.calibration_offset)
    }
}
