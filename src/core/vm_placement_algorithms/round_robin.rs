//! Round Robin algorithm.

use crate::core::resource_pool::ResourcePool;
use crate::core::vm::VirtualMachine;
use crate::core::vm_placement_algorithm::VmPlacementAlgorithm;

/// Cyclically scans the hosts for the next suitable one, resuming each call
/// from where the previous one left off.
///
/// The cursor advances on every probe regardless of its outcome, so a
/// rejected candidate is never retried within one call and consecutive
/// calls spread placements across hosts instead of piling onto the first
/// fit. A full sweep probes each host exactly once: best case O(1), worst
/// case O(n). May select an inactive host while active suitable hosts
/// exist, which increases the number of powered-on hosts.
pub struct RoundRobin {
    /// Position in the pool's insertion order where the next probe starts.
    pub next_host_index: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { next_host_index: 0 }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl VmPlacementAlgorithm for RoundRobin {
    fn select_host(&mut self, vm: &VirtualMachine, pool: &ResourcePool) -> Option<u32> {
        let host_count = pool.host_count();
        if host_count == 0 {
            return None;
        }
        // The loop only bounds the number of probes; the cursor state
        // persists across calls.
        for _ in 0..host_count {
            let candidate = pool.host_id_at(self.next_host_index % host_count);
            self.next_host_index = (self.next_host_index + 1) % host_count;
            if pool.is_suitable(candidate, vm) {
                return Some(candidate);
            }
        }
        None
    }
}
