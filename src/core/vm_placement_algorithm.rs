//! Virtual machine placement algorithms.

use crate::core::config::parse_config_value;
use crate::core::resource_pool::ResourcePool;
use crate::core::vm::VirtualMachine;
use crate::core::vm_placement_algorithms::best_fit::BestFit;
use crate::core::vm_placement_algorithms::first_fit::FirstFit;
use crate::core::vm_placement_algorithms::round_robin::RoundRobin;
use crate::core::vm_placement_algorithms::weighted_cost::WeightedCost;

/// Trait for implementation of VM placement algorithms.
///
/// The algorithm is defined as a function of a VM allocation request and the
/// current resource pool state, which returns the ID of the host selected
/// for the VM placement or `None` if there is no suitable host. Placement
/// failure is an expected outcome, not an error; retry policy belongs to
/// the caller.
///
/// Takes `&mut self` since some algorithms carry state between calls, such
/// as the round-robin cursor. Selection itself never mutates hosts; the
/// engine commits the decision afterwards.
pub trait VmPlacementAlgorithm {
    fn select_host(&mut self, vm: &VirtualMachine, pool: &ResourcePool) -> Option<u32>;
}

/// Resolves an algorithm from its config string representation, e.g.
/// `RoundRobin` or `WeightedCost[sla=0.2,waste=0.5,power=0.3]`.
///
/// Panics on unknown algorithm names and invalid options: a config that
/// cannot be resolved must not start a simulation.
pub fn placement_algorithm_resolver(config_str: &str) -> Box<dyn VmPlacementAlgorithm> {
    let (algorithm_name, options) = parse_config_value(config_str);
    match algorithm_name.as_str() {
        "RoundRobin" => Box::new(RoundRobin::new()),
        "FirstFit" => Box::new(FirstFit::new()),
        "BestFit" => Box::new(BestFit::new()),
        "WeightedCost" => Box::new(WeightedCost::from_options_str(&options.unwrap_or_default())),
        _ => panic!("Can't resolve placement algorithm: {}", config_str),
    }
}
