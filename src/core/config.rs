//! Simulation configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Represents physical host(s) configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct HostConfig {
    /// Host name. Should be set if count = 1
    pub name: Option<String>,
    /// Host name prefix. Full name is produced by appending instance number
    /// to the prefix. Should be set if count > 1
    pub name_prefix: Option<String>,
    /// number of host processing elements
    pub pes: u32,
    /// MIPS capacity of each processing element
    #[serde(default = "default_mips_per_pe")]
    pub mips_per_pe: u32,
    /// host memory capacity in megabytes
    pub memory: u64,
    /// host bandwidth in megabits per second
    #[serde(default = "default_bandwidth")]
    pub bandwidth: u64,
    /// host storage in megabytes
    #[serde(default = "default_storage")]
    pub storage: u64,
    /// power draw in Watts of the powered-on but idle host
    #[serde(default = "default_static_power")]
    pub static_power: f64,
    /// power draw in Watts of the fully loaded host
    #[serde(default = "default_max_power")]
    pub max_power: f64,
    /// number of such hosts
    pub count: Option<u32>,
}

/// Parameters of randomly generated VM workloads.
///
/// Each `[min, max]` pair bounds the uniform distribution a requirement is
/// drawn from.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RandomWorkloadConfig {
    pub vm_count: u32,
    pub pes: (u32, u32),
    pub mips_per_pe: (u32, u32),
    pub memory: (u64, u64),
    pub bandwidth: (u64, u64),
    pub storage: (u64, u64),
    /// VM lifetime in seconds
    pub lifetime: (f64, f64),
    /// VM arrival time in seconds
    pub arrival_time: (f64, f64),
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// RNG seed for workload generation and random load models
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// interval between utilization samples
    #[serde(default = "default_step_duration")]
    pub step_duration: f64,
    /// length of simulation in seconds
    #[serde(default = "default_simulation_length")]
    pub simulation_length: f64,
    /// VM placement algorithm, e.g. `RoundRobin` or
    /// `WeightedCost[sla=0.2,waste=0.5,power=0.3]`
    #[serde(default = "default_placement_algorithm")]
    pub placement_algorithm: String,
    /// cloud physical hosts
    #[serde(default)]
    pub hosts: Vec<HostConfig>,
    /// randomly generated workload, if any
    #[serde(default)]
    pub workload: Option<RandomWorkloadConfig>,
}

fn default_mips_per_pe() -> u32 {
    1000
}

fn default_bandwidth() -> u64 {
    10_000
}

fn default_storage() -> u64 {
    1_000_000
}

fn default_static_power() -> f64 {
    15.
}

fn default_max_power() -> f64 {
    50.
}

fn default_seed() -> u64 {
    123
}

fn default_step_duration() -> f64 {
    1.
}

fn default_simulation_length() -> f64 {
    100.
}

fn default_placement_algorithm() -> String {
    "RoundRobin".to_string()
}

impl SimulationConfig {
    /// Creates simulation config with default parameter values.
    pub fn new() -> Self {
        serde_yaml::from_str("{}").unwrap()
    }

    /// Creates simulation config by reading parameter values from .yaml file
    /// (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|e| panic!("Can't parse YAML from file {}: {}", file_name, e))
    }

    /// Returns total hosts count across all host config entries.
    pub fn number_of_hosts(&self) -> u32 {
        self.hosts.iter().map(|host| host.count.unwrap_or(1)).sum()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses config value string, which consists of two parts - name and options.
/// Example: `WeightedCost[sla=0.2,waste=0.5,power=0.3]` parts are name
/// `WeightedCost` and options string `sla=0.2,waste=0.5,power=0.3`.
pub fn parse_config_value(config_str: &str) -> (String, Option<String>) {
    match config_str.split_once('[') {
        Some((l, r)) => (l.to_string(), Some(r.to_string().replace(']', ""))),
        None => (config_str.to_string(), None),
    }
}

/// Parses options string from config value, returns map with option names
/// and values.
///
/// # Examples
///
/// ```rust
/// use vmplace::core::config::parse_options;
///
/// let options = parse_options("option1=0.8,option2=something");
/// assert_eq!(options.get("option1").unwrap(), "0.8");
/// assert_eq!(options.get("option2").unwrap(), "something");
/// assert_eq!(options.get("option3"), None);
/// ```
pub fn parse_options(options_str: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    for option_str in options_str.split(',') {
        if let Some((name, value)) = option_str.split_once('=') {
            options.insert(name.to_string(), value.to_string());
        }
    }
    options
}
