//! Host resource capacity accounting.

use std::collections::BTreeMap;

use crate::core::common::AllocationVerdict;
use crate::core::vm::VirtualMachine;

/// Status of a single processing element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeStatus {
    Free,
    Busy,
}

/// A schedulable unit of CPU capacity, measured in MIPS.
#[derive(Clone, Debug)]
pub struct ProcessingElement {
    pub mips: u32,
    pub status: PeStatus,
}

impl ProcessingElement {
    pub fn new(mips: u32) -> Self {
        Self {
            mips,
            status: PeStatus::Free,
        }
    }
}

/// Tracks the total and used capacity of a host across all resource
/// dimensions, along with which processing elements each VM occupies.
///
/// Checks are side-effect-free; `allocate` validates every dimension before
/// mutating any of them, so `used <= total` holds at all times and failed
/// attempts leave no partial state behind.
#[derive(Clone, Debug)]
pub struct ResourceCapacity {
    pes: Vec<ProcessingElement>,
    memory_total: u64,
    memory_used: u64,
    bandwidth_total: u64,
    bandwidth_used: u64,
    storage_total: u64,
    storage_used: u64,
    pe_assignments: BTreeMap<u32, Vec<usize>>,
}

impl ResourceCapacity {
    /// Creates capacity with the specified PE list, which is fixed for the
    /// lifetime of the host.
    pub fn new(pes: Vec<ProcessingElement>, memory: u64, bandwidth: u64, storage: u64) -> Self {
        Self {
            pes,
            memory_total: memory,
            memory_used: 0,
            bandwidth_total: bandwidth,
            bandwidth_used: 0,
            storage_total: storage,
            storage_used: 0,
            pe_assignments: BTreeMap::new(),
        }
    }

    /// Creates capacity with `pe_count` identical PEs of `mips` each.
    pub fn with_uniform_pes(pe_count: u32, mips: u32, memory: u64, bandwidth: u64, storage: u64) -> Self {
        let pes = (0..pe_count).map(|_| ProcessingElement::new(mips)).collect();
        Self::new(pes, memory, bandwidth, storage)
    }

    /// Checks whether the VM fits into the remaining capacity.
    ///
    /// The first violated dimension determines the verdict: PE count, then
    /// MIPS per PE, then memory, bandwidth and storage.
    pub fn allocation_verdict(&self, vm: &VirtualMachine) -> AllocationVerdict {
        let free_pes = self.free_pes();
        if free_pes < vm.pes {
            return AllocationVerdict::NotEnoughPes;
        }
        if self.free_pes_with_mips(vm.mips_per_pe) < vm.pes {
            return AllocationVerdict::NotEnoughMips;
        }
        if self.memory_total - self.memory_used < vm.memory {
            return AllocationVerdict::NotEnoughMemory;
        }
        if self.bandwidth_total - self.bandwidth_used < vm.bandwidth {
            return AllocationVerdict::NotEnoughBandwidth;
        }
        if self.storage_total - self.storage_used < vm.storage {
            return AllocationVerdict::NotEnoughStorage;
        }
        AllocationVerdict::Success
    }

    /// Claims resources for the VM, marking the occupied PEs as busy.
    ///
    /// Re-validates the verdict atomically with the mutation, so a stale
    /// decision made against an outdated view is rejected here instead of
    /// corrupting the accounting.
    pub fn allocate(&mut self, vm: &VirtualMachine) -> Result<(), AllocationVerdict> {
        let verdict = self.allocation_verdict(vm);
        if !verdict.is_success() {
            return Err(verdict);
        }

        let mut claimed = Vec::with_capacity(vm.pes as usize);
        for (index, pe) in self.pes.iter_mut().enumerate() {
            if claimed.len() == vm.pes as usize {
                break;
            }
            if pe.status == PeStatus::Free && pe.mips >= vm.mips_per_pe {
                pe.status = PeStatus::Busy;
                claimed.push(index);
            }
        }
        self.pe_assignments.insert(vm.id, claimed);
        self.memory_used += vm.memory;
        self.bandwidth_used += vm.bandwidth;
        self.storage_used += vm.storage;
        Ok(())
    }

    /// Returns the VM's resources to the pool. Unknown VM ids are ignored.
    pub fn release(&mut self, vm: &VirtualMachine) {
        if let Some(indexes) = self.pe_assignments.remove(&vm.id) {
            for index in indexes {
                self.pes[index].status = PeStatus::Free;
            }
            self.memory_used -= vm.memory;
            self.bandwidth_used -= vm.bandwidth;
            self.storage_used -= vm.storage;
        }
    }

    pub fn total_pes(&self) -> u32 {
        self.pes.len() as u32
    }

    pub fn free_pes(&self) -> u32 {
        self.pes.iter().filter(|pe| pe.status == PeStatus::Free).count() as u32
    }

    fn free_pes_with_mips(&self, mips: u32) -> u32 {
        self.pes
            .iter()
            .filter(|pe| pe.status == PeStatus::Free && pe.mips >= mips)
            .count() as u32
    }

    /// Total MIPS across all PEs, busy or free.
    pub fn total_mips(&self) -> u64 {
        self.pes.iter().map(|pe| pe.mips as u64).sum()
    }

    /// MIPS capacity of the currently busy PEs.
    pub fn allocated_mips(&self) -> u64 {
        self.pes
            .iter()
            .filter(|pe| pe.status == PeStatus::Busy)
            .map(|pe| pe.mips as u64)
            .sum()
    }

    pub fn total_memory(&self) -> u64 {
        self.memory_total
    }

    pub fn free_memory(&self) -> u64 {
        self.memory_total - self.memory_used
    }

    pub fn total_bandwidth(&self) -> u64 {
        self.bandwidth_total
    }

    pub fn free_bandwidth(&self) -> u64 {
        self.bandwidth_total - self.bandwidth_used
    }

    pub fn total_storage(&self) -> u64 {
        self.storage_total
    }

    pub fn free_storage(&self) -> u64 {
        self.storage_total - self.storage_used
    }
}
