//! Synchronous boundary between the allocation engine and its callers.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use sugars::{rc, refcell};

use crate::core::config::SimulationConfig;
use crate::core::host::Host;
use crate::core::logger::{Logger, StdoutLogger};
use crate::core::power_model::{CpuPowerModel, LinearPowerModel};
use crate::core::resource_pool::ResourcePool;
use crate::core::resources::ResourceCapacity;
use crate::core::vm::{VirtualMachine, VmStatus};
use crate::core::vm_placement_algorithm::{placement_algorithm_resolver, VmPlacementAlgorithm};

/// Decision returned to the broker for one VM submission.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementResult {
    Placed { host_id: u32 },
    Rejected { reason: String },
}

/// Host telemetry snapshot for reporting collaborators.
#[derive(Clone, Debug)]
pub struct HostStats {
    /// Mean of the recorded CPU utilization history, `None` before the
    /// first sample.
    pub mean_cpu_utilization: Option<f64>,
    /// Current power draw in Watts; 0 for a host that was never activated.
    pub current_power: f64,
    /// Time of the activating placement, if any.
    pub active_since: Option<f64>,
    /// Energy consumed so far, in watt-seconds.
    pub energy_consumed: f64,
}

/// Owns the hosts of one simulated datacenter and processes VM placement
/// requests with the configured placement algorithm.
///
/// All calls are synchronous; the simulation clock is external and drives
/// telemetry through [`tick`](Datacenter::tick). Selection and commit form
/// one atomic step per submission, so a placement decision is re-validated
/// against the host it names before any capacity changes. A decision naming
/// an unknown or unsuitable host is rejected rather than trusted.
pub struct Datacenter {
    pool: ResourcePool,
    algorithm: Box<dyn VmPlacementAlgorithm>,
    vm_statuses: BTreeMap<u32, VmStatus>,
    vm_locations: BTreeMap<u32, u32>,
    logger: Rc<RefCell<Box<dyn Logger>>>,
    time: f64,
    next_host_id: u32,
}

impl Datacenter {
    pub fn new(algorithm: Box<dyn VmPlacementAlgorithm>) -> Self {
        Self::with_logger(algorithm, Box::new(StdoutLogger::new()))
    }

    pub fn with_logger(algorithm: Box<dyn VmPlacementAlgorithm>, logger: Box<dyn Logger>) -> Self {
        Self {
            pool: ResourcePool::new(),
            algorithm,
            vm_statuses: BTreeMap::new(),
            vm_locations: BTreeMap::new(),
            logger: rc!(refcell!(logger)),
            time: 0.,
            next_host_id: 0,
        }
    }

    /// Builds a datacenter from config: resolves the placement algorithm
    /// and expands the host entries, appending instance numbers to
    /// `name_prefix` entries with a count.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::from_config_with_logger(config, Box::new(StdoutLogger::new()))
    }

    pub fn from_config_with_logger(config: &SimulationConfig, logger: Box<dyn Logger>) -> Self {
        let algorithm = placement_algorithm_resolver(&config.placement_algorithm);
        let mut datacenter = Self::with_logger(algorithm, logger);
        for host_config in &config.hosts {
            let count = host_config.count.unwrap_or(1);
            for i in 0..count {
                let name = match (&host_config.name, &host_config.name_prefix) {
                    (Some(name), _) => name.clone(),
                    (None, Some(prefix)) => format!("{}{}", prefix, i + 1),
                    (None, None) => format!("host{}", datacenter.next_host_id),
                };
                let capacity = ResourceCapacity::with_uniform_pes(
                    host_config.pes,
                    host_config.mips_per_pe,
                    host_config.memory,
                    host_config.bandwidth,
                    host_config.storage,
                );
                let power_model = Box::new(LinearPowerModel::new(host_config.static_power, host_config.max_power));
                datacenter.add_host(&name, capacity, power_model);
            }
        }
        datacenter
    }

    /// Adds a host and returns its ID. Host IDs follow insertion order, the
    /// same order placement algorithms scan in.
    pub fn add_host(&mut self, name: &str, capacity: ResourceCapacity, power_model: Box<dyn CpuPowerModel>) -> u32 {
        let id = self.next_host_id;
        self.next_host_id += 1;
        self.pool.add_host(Host::new(id, name, capacity, power_model));
        self.logger
            .borrow_mut()
            .log_debug(self.time, "datacenter", format!("added host #{} '{}'", id, name));
        id
    }

    /// Processes one VM placement request.
    ///
    /// Rejection is an expected outcome and does not disturb the engine;
    /// retrying is up to the submitting broker.
    pub fn submit_vm(&mut self, vm: VirtualMachine) -> PlacementResult {
        let vm_id = vm.id;
        match self.algorithm.select_host(&vm, &self.pool) {
            Some(host_id) => match self.pool.host(host_id) {
                Some(host) => match host.borrow_mut().place(vm, self.time) {
                    Ok(()) => {
                        self.vm_statuses.insert(vm_id, VmStatus::Running);
                        self.vm_locations.insert(vm_id, host_id);
                        self.logger.borrow_mut().log_debug(
                            self.time,
                            "datacenter",
                            format!("vm #{} placed on host #{}", vm_id, host_id),
                        );
                        PlacementResult::Placed { host_id }
                    }
                    Err((_, verdict)) => {
                        self.vm_statuses.insert(vm_id, VmStatus::FailedToAllocate);
                        self.logger.borrow_mut().log_warn(
                            self.time,
                            "datacenter",
                            format!("rejected placement of vm #{} on host #{}: {}", vm_id, host_id, verdict),
                        );
                        PlacementResult::Rejected {
                            reason: verdict.to_string(),
                        }
                    }
                },
                None => {
                    self.vm_statuses.insert(vm_id, VmStatus::FailedToAllocate);
                    self.logger.borrow_mut().log_warn(
                        self.time,
                        "datacenter",
                        format!("placement of vm #{} names unknown host #{}", vm_id, host_id),
                    );
                    PlacementResult::Rejected {
                        reason: "host not found".to_string(),
                    }
                }
            },
            None => {
                self.vm_statuses.insert(vm_id, VmStatus::FailedToAllocate);
                self.logger
                    .borrow_mut()
                    .log_debug(self.time, "datacenter", format!("no suitable host for vm #{}", vm_id));
                PlacementResult::Rejected {
                    reason: "no suitable host".to_string(),
                }
            }
        }
    }

    /// Destroys the VM, returning its capacity to the owning host. Returns
    /// false if the VM is not currently placed.
    pub fn destroy_vm(&mut self, vm_id: u32) -> bool {
        match self.vm_locations.remove(&vm_id) {
            Some(host_id) => {
                let host = self.pool.host(host_id).unwrap();
                host.borrow_mut().remove_vm(vm_id, self.time);
                self.vm_statuses.insert(vm_id, VmStatus::Finished);
                self.logger.borrow_mut().log_debug(
                    self.time,
                    "datacenter",
                    format!("vm #{} destroyed, released from host #{}", vm_id, host_id),
                );
                true
            }
            None => false,
        }
    }

    /// Advances the engine clock and records a utilization sample on every
    /// active host. Driven by the external simulation event loop.
    pub fn tick(&mut self, time: f64) {
        assert!(time >= self.time, "simulation clock went backwards");
        self.time = time;
        for host_id in self.pool.host_ids() {
            let host = self.pool.host(host_id).unwrap();
            let mut host = host.borrow_mut();
            if host.is_active() {
                host.record_utilization(time);
            }
        }
    }

    /// Telemetry snapshot of the specified host.
    pub fn host_stats(&self, host_id: u32) -> Option<HostStats> {
        self.pool.host(host_id).map(|host| {
            let host = host.borrow();
            HostStats {
                mean_cpu_utilization: host.stats().mean(),
                current_power: host.current_power(self.time),
                active_since: host.active_since(),
                energy_consumed: host.energy_consumed(self.time),
            }
        })
    }

    pub fn vm_status(&self, vm_id: u32) -> Option<VmStatus> {
        self.vm_statuses.get(&vm_id).cloned()
    }

    /// ID of the host currently running the VM, if it is placed.
    pub fn vm_location(&self, vm_id: u32) -> Option<u32> {
        self.vm_locations.get(&vm_id).cloned()
    }

    pub fn host(&self, host_id: u32) -> Rc<RefCell<Host>> {
        self.pool.host(host_id).unwrap()
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn current_time(&self) -> f64 {
        self.time
    }

    pub fn save_log(&self, path: &str) -> Result<(), std::io::Error> {
        self.logger.borrow().save_log(path)
    }
}
