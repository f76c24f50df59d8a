//! Energy meter calculates the host energy consumption.

/// Integrates host power draw over time, assuming the draw is constant
/// between updates.
#[derive(Clone, Debug, Default)]
pub struct EnergyMeter {
    energy_consumed: f64,
    current_power: f64,
    prev_time: f64,
}

impl EnergyMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked each time the host power consumption changes.
    pub fn update(&mut self, time: f64, power: f64) {
        self.energy_consumed += (time - self.prev_time) * self.current_power;
        self.current_power = power;
        self.prev_time = time;
    }

    /// Total consumption up to the last update, in watt-seconds.
    pub fn energy_consumed(&self) -> f64 {
        self.energy_consumed
    }

    /// Total consumption extrapolated to `time` without mutating the meter,
    /// for telemetry queries between power changes.
    pub fn consumed_until(&self, time: f64) -> f64 {
        self.energy_consumed + (time - self.prev_time) * self.current_power
    }
}
