use vmplace::core::common::AllocationVerdict;
use vmplace::core::config::SimulationConfig;
use vmplace::core::host::{Host, HostState};
use vmplace::core::load_model::{ConstantLoadModel, LoadModel, RandomLoadModel};
use vmplace::core::power_model::{ConstantPowerModel, CpuPowerModel, LinearPowerModel};
use vmplace::core::resources::ResourceCapacity;
use vmplace::core::utilization_stats::UtilizationStats;
use vmplace::core::vm::{VirtualMachine, VmStatus};
use vmplace::core::vm_placement_algorithms::round_robin::RoundRobin;
use vmplace::datacenter::{Datacenter, PlacementResult};

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn host(id: u32, pes: u32) -> Host {
    Host::new(
        id,
        &format!("h{}", id),
        ResourceCapacity::with_uniform_pes(pes, 1000, 2048, 10_000, 1_000_000),
        Box::new(LinearPowerModel::new(15., 50.)),
    )
}

fn vm(id: u32, pes: u32) -> VirtualMachine {
    VirtualMachine::new(id, pes, 1000, 512, 100, 100, Box::new(ConstantLoadModel::new(1.)))
}

#[test]
// A suitable VM placement succeeds, and the remaining capacity may no
// longer fit an identical VM afterwards.
fn test_suitability_and_placement() {
    let mut h = host(1, 2);
    let first = vm(1, 2);

    assert!(h.is_suitable(&first));
    assert!(h.place(first, 0.).is_ok());
    assert_eq!(h.capacity().free_pes(), 0);
    assert_eq!(h.capacity().free_memory(), 2048 - 512);

    let second = vm(2, 2);
    assert!(!h.is_suitable(&second));
    assert_eq!(h.allocation_verdict(&second), AllocationVerdict::NotEnoughPes);
}

#[test]
// The verdict names the first violated dimension, in check order.
fn test_verdict_names_first_violated_dimension() {
    let h = Host::new(
        1,
        "h1",
        ResourceCapacity::with_uniform_pes(4, 1000, 1000, 1000, 1000),
        Box::new(LinearPowerModel::new(15., 50.)),
    );

    let too_many_pes = VirtualMachine::new(1, 8, 500, 100, 100, 100, Box::new(ConstantLoadModel::new(1.)));
    assert_eq!(h.allocation_verdict(&too_many_pes), AllocationVerdict::NotEnoughPes);

    let too_fast_pes = VirtualMachine::new(2, 2, 2000, 100, 100, 100, Box::new(ConstantLoadModel::new(1.)));
    assert_eq!(h.allocation_verdict(&too_fast_pes), AllocationVerdict::NotEnoughMips);

    let too_much_memory = VirtualMachine::new(3, 2, 500, 2000, 100, 100, Box::new(ConstantLoadModel::new(1.)));
    assert_eq!(h.allocation_verdict(&too_much_memory), AllocationVerdict::NotEnoughMemory);

    let too_much_bandwidth = VirtualMachine::new(4, 2, 500, 100, 5000, 100, Box::new(ConstantLoadModel::new(1.)));
    assert_eq!(
        h.allocation_verdict(&too_much_bandwidth),
        AllocationVerdict::NotEnoughBandwidth
    );

    let too_much_storage = VirtualMachine::new(5, 2, 500, 100, 100, 5000, Box::new(ConstantLoadModel::new(1.)));
    assert_eq!(h.allocation_verdict(&too_much_storage), AllocationVerdict::NotEnoughStorage);
}

#[test]
// A failed placement leaves the host capacity untouched in every dimension.
fn test_placement_failure_leaves_capacity_unchanged() {
    let mut h = Host::new(
        1,
        "h1",
        ResourceCapacity::with_uniform_pes(4, 1000, 1000, 1000, 1000),
        Box::new(LinearPowerModel::new(15., 50.)),
    );

    // Passes PE, memory and bandwidth checks, fails on storage.
    let oversized = VirtualMachine::new(1, 2, 500, 100, 100, 5000, Box::new(ConstantLoadModel::new(1.)));
    let result = h.place(oversized, 0.);
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().1, AllocationVerdict::NotEnoughStorage);

    assert_eq!(h.capacity().free_pes(), 4);
    assert_eq!(h.capacity().free_memory(), 1000);
    assert_eq!(h.capacity().free_bandwidth(), 1000);
    assert_eq!(h.capacity().free_storage(), 1000);
    assert_eq!(h.state(), HostState::Inactive);
    assert_eq!(h.vm_count(), 0);
}

#[test]
// Hosts start inactive and draw no power; the first placement activates
// them and stamps the activation time.
fn test_on_demand_activation() {
    let mut h = host(1, 8);

    assert_eq!(h.state(), HostState::Inactive);
    assert_eq!(h.active_since(), None);
    assert_eq!(h.current_power(0.), 0.);

    assert!(h.place(vm(1, 2), 5.).is_ok());
    assert_eq!(h.state(), HostState::Active { since: 5. });
    assert_eq!(h.active_since(), Some(5.));
    assert!(h.current_power(5.) > 0.);

    // No reverse transition: the host stays active after its last VM leaves.
    h.remove_vm(1, 6.);
    assert_eq!(h.active_since(), Some(5.));
}

#[test]
// Linear power model interpolates between static and max power.
fn test_power_model_boundaries() {
    let model = LinearPowerModel::new(15., 50.);
    assert_eq!(model.get_power(0.), 15.);
    assert_eq!(model.get_power(1.), 50.);
    assert_eq!(model.get_power(0.5), 32.5);
    // Overload clamps to the full-load draw.
    assert_eq!(model.get_power(1.5), 50.);
}

#[test]
#[should_panic]
// Negative utilization can only come from a broken computation upstream.
fn test_power_model_rejects_negative_utilization() {
    LinearPowerModel::new(15., 50.).get_power(-0.1);
}

#[test]
// Overriding the linear model with a constant one changes the accumulated
// energy accordingly: 1 W over two seconds is 2 watt-seconds.
fn test_constant_power_model() {
    let mut dc = Datacenter::new(Box::new(RoundRobin::new()));
    let h = dc.add_host(
        "h1",
        ResourceCapacity::with_uniform_pes(4, 1000, 2048, 10_000, 1_000_000),
        Box::new(ConstantPowerModel::new(1.)),
    );

    assert_eq!(dc.submit_vm(vm(1, 2)), PlacementResult::Placed { host_id: h });
    dc.tick(1.);
    dc.tick(2.);

    let stats = dc.host_stats(h).unwrap();
    assert_eq!(stats.current_power, 1.);
    assert_eq!(stats.energy_consumed, 2.);
}

#[test]
// Same seed replays the same load sequence, kept within the bounds.
fn test_random_load_model_determinism() {
    let first = RandomLoadModel::new(0.2, 0.8, 7);
    let second = RandomLoadModel::new(0.2, 0.8, 7);
    for step in 0..10 {
        let time = step as f64;
        let load = first.get_resource_load(time, time);
        assert_eq!(load, second.get_resource_load(time, time));
        assert!((0.2..0.8).contains(&load));
    }
}

#[test]
// Aggregates refuse to answer before the first sample.
fn test_utilization_stats_empty_history() {
    let stats = UtilizationStats::new();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.mean(), None);
    assert_eq!(stats.min(), None);
    assert_eq!(stats.max(), None);
}

#[test]
fn test_utilization_stats_aggregates() {
    let mut stats = UtilizationStats::new();
    stats.record(0.25);
    stats.record(0.5);
    stats.record(0.75);
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.mean(), Some(0.5));
    assert_eq!(stats.min(), Some(0.25));
    assert_eq!(stats.max(), Some(0.75));
}

#[test]
// Host with 4 PEs of 1000 MIPS runs a VM occupying half of its capacity.
// Power model is 10 W static, 30 W max, so the draw is 10 + 0.5 * 20 = 20 W
// and after two seconds the host consumed 40 watt-seconds.
fn test_energy_metering() {
    let mut dc = Datacenter::new(Box::new(RoundRobin::new()));
    let h = dc.add_host(
        "h1",
        ResourceCapacity::with_uniform_pes(4, 1000, 2048, 10_000, 1_000_000),
        Box::new(LinearPowerModel::new(10., 30.)),
    );

    let result = dc.submit_vm(vm(1, 2));
    assert_eq!(result, PlacementResult::Placed { host_id: h });

    dc.tick(1.);
    dc.tick(2.);

    let stats = dc.host_stats(h).unwrap();
    assert_eq!(stats.mean_cpu_utilization, Some(0.5));
    assert_eq!(stats.current_power, 20.);
    assert_eq!(stats.active_since, Some(0.));
    assert_eq!(stats.energy_consumed, 40.);
}

#[test]
// Inactive hosts are not sampled and report zero power.
fn test_inactive_host_telemetry() {
    let mut dc = Datacenter::new(Box::new(RoundRobin::new()));
    let h = dc.add_host(
        "h1",
        ResourceCapacity::with_uniform_pes(4, 1000, 2048, 10_000, 1_000_000),
        Box::new(LinearPowerModel::new(10., 30.)),
    );

    dc.tick(1.);
    dc.tick(2.);

    let stats = dc.host_stats(h).unwrap();
    assert_eq!(stats.mean_cpu_utilization, None);
    assert_eq!(stats.current_power, 0.);
    assert_eq!(stats.active_since, None);
    assert_eq!(stats.energy_consumed, 0.);
}

#[test]
// Rejected VM does not disturb the engine; destroying a VM returns its
// capacity and a retry succeeds.
fn test_submit_destroy_lifecycle() {
    let mut dc = Datacenter::new(Box::new(RoundRobin::new()));
    let h = dc.add_host(
        "h1",
        ResourceCapacity::with_uniform_pes(2, 1000, 2048, 10_000, 1_000_000),
        Box::new(LinearPowerModel::new(15., 50.)),
    );

    assert_eq!(dc.submit_vm(vm(1, 2)), PlacementResult::Placed { host_id: h });
    assert_eq!(dc.vm_status(1), Some(VmStatus::Running));
    assert_eq!(dc.vm_location(1), Some(h));

    let rejected = dc.submit_vm(vm(2, 2));
    assert_eq!(
        rejected,
        PlacementResult::Rejected {
            reason: "no suitable host".to_string()
        }
    );
    assert_eq!(dc.vm_status(2), Some(VmStatus::FailedToAllocate));
    assert_eq!(dc.vm_location(2), None);

    assert!(dc.destroy_vm(1));
    assert_eq!(dc.vm_status(1), Some(VmStatus::Finished));
    assert_eq!(dc.host(h).borrow().vm_count(), 0);

    assert_eq!(dc.submit_vm(vm(3, 2)), PlacementResult::Placed { host_id: h });
}

#[test]
// Host entries with a name prefix and count expand into numbered hosts.
fn test_config_host_expansion() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    assert_eq!(config.number_of_hosts(), 4);
    assert_eq!(config.placement_algorithm, "RoundRobin");

    let dc = Datacenter::from_config(&config);
    assert_eq!(dc.pool().host_count(), 4);
    assert_eq!(dc.host(0).borrow().name, "host1");
    assert_eq!(dc.host(3).borrow().name, "host4");
    assert_eq!(dc.host(0).borrow().capacity().total_pes(), 8);
    assert_eq!(dc.host(0).borrow().capacity().total_memory(), 2048);
}
