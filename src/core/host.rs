//! Physical host owning capacity, telemetry and placed VMs.

use std::collections::BTreeMap;

use crate::core::common::AllocationVerdict;
use crate::core::energy_meter::EnergyMeter;
use crate::core::power_model::CpuPowerModel;
use crate::core::resources::ResourceCapacity;
use crate::core::utilization_stats::UtilizationStats;
use crate::core::vm::VirtualMachine;

/// Host lifecycle state.
///
/// Hosts are created inactive and are activated on demand by the first
/// successful placement. There is no reverse transition; idle shutdown is a
/// concern of an outer management layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostState {
    Inactive,
    Active { since: f64 },
}

pub struct Host {
    pub id: u32,
    pub name: String,
    capacity: ResourceCapacity,
    power_model: Box<dyn CpuPowerModel>,
    stats: UtilizationStats,
    energy_meter: EnergyMeter,
    vms: BTreeMap<u32, VirtualMachine>,
    state: HostState,
}

impl Host {
    pub fn new(id: u32, name: &str, capacity: ResourceCapacity, power_model: Box<dyn CpuPowerModel>) -> Self {
        Self {
            id,
            name: name.to_string(),
            capacity,
            power_model,
            stats: UtilizationStats::new(),
            energy_meter: EnergyMeter::new(),
            vms: BTreeMap::new(),
            state: HostState::Inactive,
        }
    }

    /// Checks the VM against the remaining capacity without allocating
    /// anything.
    pub fn allocation_verdict(&self, vm: &VirtualMachine) -> AllocationVerdict {
        self.capacity.allocation_verdict(vm)
    }

    pub fn is_suitable(&self, vm: &VirtualMachine) -> bool {
        self.capacity.allocation_verdict(vm).is_success()
    }

    /// Places the VM on this host, taking ownership of it.
    ///
    /// Suitability is re-validated atomically with the mutation; on failure
    /// the VM is handed back together with the verdict naming the first
    /// violated dimension and the host is left unchanged. The first
    /// successful placement activates the host.
    pub fn place(&mut self, mut vm: VirtualMachine, time: f64) -> Result<(), (VirtualMachine, AllocationVerdict)> {
        if let Err(verdict) = self.capacity.allocate(&vm) {
            return Err((vm, verdict));
        }
        if self.state == HostState::Inactive {
            self.state = HostState::Active { since: time };
            self.energy_meter.update(time, 0.);
        }
        vm.set_start_time(time);
        self.vms.insert(vm.id, vm);
        let power = self.current_power(time);
        self.energy_meter.update(time, power);
        Ok(())
    }

    /// Destroys the VM and returns its resources to the pool.
    pub fn remove_vm(&mut self, vm_id: u32, time: f64) -> Option<VirtualMachine> {
        let vm = self.vms.remove(&vm_id)?;
        self.capacity.release(&vm);
        let power = self.current_power(time);
        self.energy_meter.update(time, power);
        Some(vm)
    }

    /// Current CPU utilization as a fraction of the total MIPS capacity,
    /// driven by the load models of the placed VMs.
    pub fn cpu_utilization(&self, time: f64) -> f64 {
        if self.state == HostState::Inactive {
            return 0.;
        }
        let mut mips_used = 0.;
        for vm in self.vms.values() {
            mips_used += vm.mips_demand() as f64 * vm.cpu_load(time);
        }
        (mips_used / self.capacity.total_mips() as f64).min(1.)
    }

    /// Current power draw in Watts. An inactive host draws nothing,
    /// whatever its utilization history says.
    pub fn current_power(&self, time: f64) -> f64 {
        match self.state {
            HostState::Inactive => 0.,
            HostState::Active { .. } => self.power_model.get_power(self.cpu_utilization(time)),
        }
    }

    /// Power draw this host would have after additionally hosting `vm`,
    /// assuming full use of the allocated capacity. Used by cost-driven
    /// placement; evaluates the model even for an inactive host, which
    /// would be activated by the placement.
    pub fn projected_power(&self, vm: &VirtualMachine) -> f64 {
        let projected_mips = (self.capacity.allocated_mips() + vm.mips_demand()) as f64;
        let utilization = (projected_mips / self.capacity.total_mips() as f64).min(1.);
        self.power_model.get_power(utilization)
    }

    /// Power draw of the host at full utilization.
    pub fn full_load_power(&self) -> f64 {
        self.power_model.get_power(1.)
    }

    /// Records a utilization sample and refreshes the energy meter.
    /// Invoked on simulation clock ticks for active hosts.
    pub fn record_utilization(&mut self, time: f64) {
        let utilization = self.cpu_utilization(time);
        self.stats.record(utilization);
        let power = self.current_power(time);
        self.energy_meter.update(time, power);
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, HostState::Active { .. })
    }

    /// Time of the activating placement, if the host was ever activated.
    pub fn active_since(&self) -> Option<f64> {
        match self.state {
            HostState::Inactive => None,
            HostState::Active { since } => Some(since),
        }
    }

    pub fn capacity(&self) -> &ResourceCapacity {
        &self.capacity
    }

    pub fn stats(&self) -> &UtilizationStats {
        &self.stats
    }

    /// Total energy consumed up to `time`, in watt-seconds.
    pub fn energy_consumed(&self, time: f64) -> f64 {
        self.energy_meter.consumed_until(time)
    }

    pub fn vm_count(&self) -> usize {
        self.vms.len()
    }

    pub fn vm_ids(&self) -> Vec<u32> {
        self.vms.keys().cloned().collect()
    }
}
