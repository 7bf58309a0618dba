//! Temperature sensor adapters.
//!
//! - [`SimulatedTemperature`]: a slowly drifting reading for the host
//!   simulator.
//! - [`FixedTemperature`]: constant (or absent) reading for tests and for
//!   boards without a sensor fitted.

use crate::app::ports::TemperaturePort;

/// Reading that walks up and down between two bounds, one step per read.
pub struct SimulatedTemperature {
    current: i16,
    step: i16,
    min: i16,
    max: i16,
}

impl SimulatedTemperature {
    /// Start at `start` decicelsius, drifting by `step` within `[min, max]`.
    pub fn new(start: i16, step: i16, min: i16, max: i16) -> Self {
        Self {
            current: start.clamp(min, max),
            step,
            min,
            max,
        }
    }
}

impl Default for SimulatedTemperature {
    /// Room temperature, 0.3 °C steps between 18 and 26 °C.
    fn default() -> Self {
        Self::new(215, 3, 180, 260)
    }
}

impl TemperaturePort for SimulatedTemperature {
    fn read_decicelsius(&mut self) -> Option<i16> {
        let reading = self.current;
        let next = self.current.saturating_add(self.step);
        if next > self.max || next < self.min {
            self.step = -self.step;
        }
        self.current = self.current.saturating_add(self.step).clamp(self.min, self.max);
        Some(reading)
    }
}

pub struct FixedTemperature(pub Option<i16>);

impl TemperaturePort for FixedTemperature {
    fn read_decicelsius(&mut self) -> Option<i16> {
        self.0
    }
}
