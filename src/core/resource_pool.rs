//! Registry of hosts known to the allocation engine.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use sugars::{rc, refcell};

use crate::core::common::AllocationVerdict;
use crate::core::host::Host;
use crate::core::vm::VirtualMachine;

/// Insertion-ordered collection of hosts with the read-only query surface
/// used by placement algorithms.
///
/// The ordering is stable across calls: round-robin indexes into it
/// positionally, so hosts are never reordered, only appended.
pub struct ResourcePool {
    hosts: IndexMap<u32, Rc<RefCell<Host>>>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self { hosts: IndexMap::new() }
    }

    /// Adds a host to the pool. Host ids must be unique.
    pub fn add_host(&mut self, host: Host) -> Rc<RefCell<Host>> {
        let id = host.id;
        assert!(!self.hosts.contains_key(&id), "duplicate host id {}", id);
        let handle = rc!(refcell!(host));
        self.hosts.insert(id, handle.clone());
        handle
    }

    pub fn host(&self, host_id: u32) -> Option<Rc<RefCell<Host>>> {
        self.hosts.get(&host_id).cloned()
    }

    /// Returns IDs of all hosts in insertion order.
    pub fn host_ids(&self) -> Vec<u32> {
        self.hosts.keys().cloned().collect()
    }

    /// Returns the ID of the host at the given position in insertion order.
    pub fn host_id_at(&self, index: usize) -> u32 {
        *self.hosts.get_index(index).unwrap().0
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Checks if the specified VM currently fits on the specified host.
    pub fn allocation_verdict(&self, host_id: u32, vm: &VirtualMachine) -> AllocationVerdict {
        match self.hosts.get(&host_id) {
            Some(host) => host.borrow().allocation_verdict(vm),
            None => AllocationVerdict::HostNotFound,
        }
    }

    pub fn is_suitable(&self, host_id: u32, vm: &VirtualMachine) -> bool {
        self.allocation_verdict(host_id, vm).is_success()
    }

    pub fn free_pes(&self, host_id: u32) -> u32 {
        self.hosts[&host_id].borrow().capacity().free_pes()
    }

    pub fn total_pes(&self, host_id: u32) -> u32 {
        self.hosts[&host_id].borrow().capacity().total_pes()
    }

    /// Mean of the host's recorded CPU utilization history, if any.
    pub fn mean_cpu_utilization(&self, host_id: u32) -> Option<f64> {
        self.hosts[&host_id].borrow().stats().mean()
    }

    /// Power draw the host would have after additionally hosting `vm`.
    pub fn projected_power(&self, host_id: u32, vm: &VirtualMachine) -> f64 {
        self.hosts[&host_id].borrow().projected_power(vm)
    }

    /// Power draw of the host at full utilization, used to normalize
    /// power terms across heterogeneous hosts.
    pub fn full_load_power(&self, host_id: u32) -> f64 {
        self.hosts[&host_id].borrow().full_load_power()
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}
