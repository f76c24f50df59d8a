//! Representations of virtual machine and its status.

use std::fmt::{Display, Formatter};

use crate::core::load_model::LoadModel;

/// Broker-visible status of a virtual machine.
#[derive(Clone, Debug, PartialEq)]
pub enum VmStatus {
    Running,
    FailedToAllocate,
    Finished,
}

impl Display for VmStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            VmStatus::Running => write!(f, "running"),
            VmStatus::FailedToAllocate => write!(f, "failed_to_allocate"),
            VmStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Represents a virtual machine (VM).
///
/// A VM is characterized by its ID, resource requirements across all
/// dimensions and a CPU load model describing its actual utilization over
/// time, which may differ from the requested capacity. After a successful
/// placement the VM is owned by exactly one host until it is destroyed.
#[derive(Clone)]
pub struct VirtualMachine {
    pub id: u32,
    /// Number of whole processing elements the VM occupies.
    pub pes: u32,
    /// Minimum MIPS capacity of each occupied PE.
    pub mips_per_pe: u32,
    pub memory: u64,
    pub bandwidth: u64,
    pub storage: u64,
    start_time: f64,
    cpu_load_model: Box<dyn LoadModel>,
}

impl VirtualMachine {
    pub fn new(
        id: u32,
        pes: u32,
        mips_per_pe: u32,
        memory: u64,
        bandwidth: u64,
        storage: u64,
        cpu_load_model: Box<dyn LoadModel>,
    ) -> Self {
        Self {
            id,
            pes,
            mips_per_pe,
            memory,
            bandwidth,
            storage,
            start_time: -1.,
            cpu_load_model,
        }
    }

    /// Total MIPS demand of the VM.
    pub fn mips_demand(&self) -> u64 {
        self.pes as u64 * self.mips_per_pe as u64
    }

    /// Returns the placement time, or -1 if the VM has not been placed yet.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Stamps the placement time. Called by the host on placement.
    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Returns the current CPU load of the VM by invoking its load model.
    pub fn cpu_load(&self, time: f64) -> f64 {
        self.cpu_load_model.get_resource_load(time, time - self.start_time)
    }
}
