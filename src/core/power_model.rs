//! Physical host power consumption models.

use dyn_clone::{clone_trait_object, DynClone};

/// A power model is a function, which computes the power consumption of a
/// physical host (in Watts) based on its current CPU utilization.
///
/// Whether the host is powered on at all is decided by the host itself:
/// an inactive host draws no power regardless of the model.
pub trait CpuPowerModel: DynClone {
    /// Returns the power consumption for the given CPU utilization.
    ///
    /// Utilization above 1 is treated as a fully loaded host. Negative or
    /// non-finite utilization indicates a broken computation upstream and
    /// panics.
    fn get_power(&self, utilization: f64) -> f64;
}

clone_trait_object!(CpuPowerModel);

/// A power model based on linear interpolation between the static power
/// (host powered on but idle) and the maximum power (fully loaded host).
#[derive(Clone)]
pub struct LinearPowerModel {
    static_power: f64,
    max_power: f64,
}

impl LinearPowerModel {
    /// Creates a linear power model.
    ///
    /// * `static_power` - power consumption in Watts at 0% utilization.
    /// * `max_power` - power consumption in Watts at 100% utilization.
    pub fn new(static_power: f64, max_power: f64) -> Self {
        Self {
            static_power,
            max_power,
        }
    }
}

impl CpuPowerModel for LinearPowerModel {
    fn get_power(&self, utilization: f64) -> f64 {
        assert!(
            utilization.is_finite() && utilization >= 0.,
            "invalid CPU utilization: {}",
            utilization
        );
        let utilization = utilization.min(1.);
        self.static_power + utilization * (self.max_power - self.static_power)
    }
}

/// Constant power consumption regardless of utilization.
#[derive(Clone)]
pub struct ConstantPowerModel {
    power: f64,
}

impl ConstantPowerModel {
    pub fn new(power: f64) -> Self {
        Self { power }
    }
}

impl CpuPowerModel for ConstantPowerModel {
    fn get_power(&self, _utilization: f64) -> f64 {
        self.power
    }
}
