//! Trait for dataset readers.

use serde::{Deserialize, Serialize};

/// Represents information about a single virtual machine from a dataset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VmRequest {
    pub id: u32,
    pub pes: u32,
    pub mips_per_pe: u32,
    pub memory: u64,
    pub bandwidth: u64,
    pub storage: u64,
    pub arrival_time: f64,
    pub lifetime: f64,
}

pub trait DatasetReader {
    /// Returns the next VM from the dataset (if any).
    ///
    /// VMs are returned in non-decreasing order of their arrival times.
    fn next_request(&mut self) -> Option<VmRequest>;
}
