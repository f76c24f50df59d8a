//! Core components of the allocation engine.

pub mod common;
pub mod config;
pub mod energy_meter;
pub mod host;
pub mod load_model;
pub mod logger;
pub mod power_model;
pub mod resource_pool;
pub mod resources;
pub mod utilization_stats;
pub mod vm;
pub mod vm_placement_algorithm;
pub mod vm_placement_algorithms;
