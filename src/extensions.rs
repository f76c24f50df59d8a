//! Workload supply for simulation runs.

pub mod dataset_reader;
pub mod json_dataset_reader;
pub mod random_workload;
