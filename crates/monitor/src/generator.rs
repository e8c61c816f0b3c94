//! Simulated temperature readings.
//!
//! [`TemperatureSource`] is the seam between a sensor cycle and whatever
//! produces its numbers. [`RandomTemperature`] stands in for real hardware.

use rand::Rng;
use thermo_core::reading::{MAX_READING_CELSIUS, MIN_READING_CELSIUS};
use thermo_core::types::Celsius;

/// Produces one temperature sample per call.
pub trait TemperatureSource: Send + Sync {
    fn sample(&self) -> Celsius;
}

/// Uniformly random whole-degree readings in
/// `MIN_READING_CELSIUS..=MAX_READING_CELSIUS`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTemperature;

impl TemperatureSource for RandomTemperature {
    fn sample(&self) -> Celsius {
        rand::rng().random_range(MIN_READING_CELSIUS..=MAX_READING_CELSIUS)
    }
}
