//! Best Fit algorithm.

use crate::core::resource_pool::ResourcePool;
use crate::core::vm::VirtualMachine;
use crate::core::vm_placement_algorithm::VmPlacementAlgorithm;

/// Uses the suitable host with the fewest free processing elements, the
/// tightest fit. Ties are broken by the lowest host id for determinism.
pub struct BestFit;

impl BestFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl VmPlacementAlgorithm for BestFit {
    fn select_host(&mut self, vm: &VirtualMachine, pool: &ResourcePool) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut min_free_pes: u32 = u32::MAX;

        for host in pool.host_ids() {
            if !pool.is_suitable(host, vm) {
                continue;
            }
            let free_pes = pool.free_pes(host);
            let tighter = match result {
                None => true,
                Some(best) => free_pes < min_free_pes || (free_pes == min_free_pes && host < best),
            };
            if tighter {
                min_free_pes = free_pes;
                result = Some(host);
            }
        }
        result
    }
}
