//! First Fit algorithm.

use crate::core::resource_pool::ResourcePool;
use crate::core::vm::VirtualMachine;
use crate::core::vm_placement_algorithm::VmPlacementAlgorithm;

/// Uses the first suitable host. Unlike round-robin it keeps no cursor, so
/// consecutive placements pile onto the earliest hosts.
pub struct FirstFit;

impl FirstFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl VmPlacementAlgorithm for FirstFit {
    fn select_host(&mut self, vm: &VirtualMachine, pool: &ResourcePool) -> Option<u32> {
        pool.host_ids().into_iter().find(|&host| pool.is_suitable(host, vm))
    }
}
