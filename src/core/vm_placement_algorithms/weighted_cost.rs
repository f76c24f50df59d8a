//! Weighted cost algorithm for optimization-driven placement.

use std::fmt::{Display, Formatter};

use crate::core::config::parse_options;
use crate::core::resource_pool::ResourcePool;
use crate::core::vm::VirtualMachine;
use crate::core::vm_placement_algorithm::VmPlacementAlgorithm;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Relative importance of the three objective terms. The weights must sum
/// to 1; construction of the algorithm rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectiveWeights {
    pub sla: f64,
    pub waste: f64,
    pub power: f64,
}

impl ObjectiveWeights {
    pub fn new(sla: f64, waste: f64, power: f64) -> Self {
        Self { sla, waste, power }
    }

    pub fn sum(&self) -> f64 {
        self.sla + self.waste + self.power
    }
}

/// Error returned when the objective weights do not sum to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidWeights {
    pub sum: f64,
}

impl Display for InvalidWeights {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "objective weights must sum to 1, got {}", self.sum)
    }
}

impl std::error::Error for InvalidWeights {}

/// Selects the suitable host minimizing a weighted objective over an SLA
/// penalty, a resource waste term and a power cost term. Ties are broken by
/// the lowest host id.
///
/// This is the scoring contract a search-based placement strategy has to
/// satisfy; the scan here is exhaustive, which is enough at simulated pool
/// sizes. A metaheuristic exploring the same objective can replace the scan
/// without changing the construction or selection interface.
pub struct WeightedCost {
    weights: ObjectiveWeights,
}

impl WeightedCost {
    /// Creates the algorithm, failing fast if the weights do not sum to 1.
    pub fn new(weights: ObjectiveWeights) -> Result<Self, InvalidWeights> {
        let sum = weights.sum();
        if (sum - 1.).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InvalidWeights { sum });
        }
        Ok(Self { weights })
    }

    /// Creates the algorithm from an options string like
    /// `sla=0.2,waste=0.5,power=0.3`. Panics on malformed options or
    /// invalid weights, as config errors must not start a simulation.
    pub fn from_options_str(s: &str) -> Self {
        let options = parse_options(s);
        let weight = |name: &str| {
            options
                .get(name)
                .unwrap_or_else(|| panic!("missing weight option: {}", name))
                .parse::<f64>()
                .unwrap_or_else(|e| panic!("bad weight option {}: {}", name, e))
        };
        let weights = ObjectiveWeights::new(weight("sla"), weight("waste"), weight("power"));
        Self::new(weights).unwrap_or_else(|e| panic!("{}", e))
    }

    /// The objective: plain weighted sum of the three cost terms, each
    /// normalized to `[0, 1]`, lower is better.
    pub fn objective(&self, sla_penalty: f64, resource_waste: f64, power_cost: f64) -> f64 {
        self.weights.sla * sla_penalty + self.weights.waste * resource_waste + self.weights.power * power_cost
    }

    fn score(&self, vm: &VirtualMachine, pool: &ResourcePool, host: u32) -> f64 {
        // Overload risk proxy: how loaded the host has historically been.
        let sla_penalty = pool.mean_cpu_utilization(host).unwrap_or(0.);

        // Capacity left idle on this host after the placement.
        let free_after = pool.free_pes(host) - vm.pes;
        let resource_waste = free_after as f64 / pool.total_pes(host) as f64;

        // Projected draw relative to the host's full-load draw.
        let full_load = pool.full_load_power(host);
        let power_cost = if full_load > 0. {
            pool.projected_power(host, vm) / full_load
        } else {
            0.
        };

        self.objective(sla_penalty, resource_waste, power_cost)
    }
}

impl VmPlacementAlgorithm for WeightedCost {
    fn select_host(&mut self, vm: &VirtualMachine, pool: &ResourcePool) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut best_score = f64::MAX;

        for host in pool.host_ids() {
            if !pool.is_suitable(host, vm) {
                continue;
            }
            let score = self.score(vm, pool, host);
            let better = match result {
                None => true,
                Some(best) => score < best_score || (score == best_score && host < best),
            };
            if better {
                best_score = score;
                result = Some(host);
            }
        }
        result
    }
}
