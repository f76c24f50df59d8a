use indexmap::map::IndexMap;
use log::Level;

use vmplace::core::config::{HostConfig, RandomWorkloadConfig, SimulationConfig};
use vmplace::datacenter::Datacenter;
use vmplace::experiment::{Experiment, SimulationCallbacks};
use vmplace::extensions::dataset_reader::DatasetReader;
use vmplace::extensions::json_dataset_reader::JsonDatasetReader;
use vmplace::extensions::random_workload::RandomWorkload;

fn workload_config() -> RandomWorkloadConfig {
    RandomWorkloadConfig {
        vm_count: 10,
        pes: (1, 4),
        mips_per_pe: (500, 1000),
        memory: (256, 1024),
        bandwidth: (100, 1000),
        storage: (1000, 10_000),
        lifetime: (1., 100.),
        arrival_time: (0., 50.),
    }
}

#[test]
// The same config and seed replay the same workload, ordered by arrival.
fn test_random_workload_determinism() {
    let config = workload_config();
    let mut first = RandomWorkload::new(&config, 42);
    let mut second = RandomWorkload::new(&config, 42);

    let mut prev_arrival = 0.;
    for _ in 0..10 {
        let a = first.next_request().unwrap();
        let b = second.next_request().unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.pes, b.pes);
        assert_eq!(a.mips_per_pe, b.mips_per_pe);
        assert_eq!(a.memory, b.memory);
        assert_eq!(a.arrival_time, b.arrival_time);

        assert!((1..=4).contains(&a.pes));
        assert!((256..=1024).contains(&a.memory));
        assert!(a.arrival_time >= prev_arrival);
        prev_arrival = a.arrival_time;
    }
    assert!(first.next_request().is_none());
}

#[test]
// Requests come out ordered by arrival time regardless of file order.
fn test_json_dataset_reader() {
    let path = std::env::temp_dir().join("vmplace_test_vms.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 2, "pes": 2, "mips_per_pe": 1000, "memory": 512, "bandwidth": 100, "storage": 100, "arrival_time": 10.0, "lifetime": 50.0},
            {"id": 1, "pes": 1, "mips_per_pe": 500, "memory": 256, "bandwidth": 50, "storage": 50, "arrival_time": 1.0, "lifetime": 20.0}
        ]"#,
    )
    .unwrap();

    let mut reader = JsonDatasetReader::new();
    reader.parse(path.to_str().unwrap());

    let first = reader.next_request().unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.arrival_time, 1.0);
    let second = reader.next_request().unwrap();
    assert_eq!(second.id, 2);
    assert!(reader.next_request().is_none());
}

#[derive(Clone)]
struct EnergyReport {}

impl SimulationCallbacks for EnergyReport {
    fn on_run_finish(&mut self, dc: &mut Datacenter) -> IndexMap<String, String> {
        let total_energy: f64 = dc
            .pool()
            .host_ids()
            .into_iter()
            .map(|id| dc.host_stats(id).unwrap().energy_consumed)
            .sum();
        let mut results = IndexMap::new();
        results.insert("total_energy".to_string(), format!("{:.2}", total_energy));
        results
    }
}

#[test]
// Two runs in parallel produce per-run CSV logs and a results.json holding
// one entry per run.
fn test_experiment_runs() {
    let mut config = SimulationConfig::new();
    config.simulation_length = 20.;
    config.hosts.push(HostConfig {
        name: None,
        name_prefix: Some("h".to_string()),
        pes: 4,
        mips_per_pe: 1000,
        memory: 2048,
        bandwidth: 10_000,
        storage: 1_000_000,
        static_power: 15.,
        max_power: 50.,
        count: Some(2),
    });
    config.workload = Some(RandomWorkloadConfig {
        vm_count: 4,
        pes: (1, 2),
        mips_per_pe: (500, 1000),
        memory: (128, 512),
        bandwidth: (10, 100),
        storage: (100, 1000),
        lifetime: (5., 10.),
        arrival_time: (0., 10.),
    });
    let mut other = config.clone();
    other.placement_algorithm = "BestFit".to_string();

    let log_dir = std::env::temp_dir().join("vmplace_test_experiment");
    let _ = std::fs::remove_dir_all(&log_dir);
    let log_dir = log_dir.to_str().unwrap().to_string();

    let mut experiment = Experiment::new(
        vec![config, other],
        Box::new(EnergyReport {}),
        Some(log_dir.clone()),
        Level::Debug,
    );
    experiment.run(2);

    let results = std::fs::read_to_string(format!("{}/results.json", log_dir)).unwrap();
    let results: serde_json::Value = serde_json::from_str(&results).unwrap();
    let runs = results.as_array().unwrap();
    assert_eq!(runs.len(), 2);
    for run in runs {
        assert!(run.get("id").is_some());
        assert!(run.get("config").is_some());
        assert!(run["results"].get("total_energy").is_some());
    }

    assert!(std::path::Path::new(&format!("{}/log_1.csv", log_dir)).exists());
    assert!(std::path::Path::new(&format!("{}/log_2.csv", log_dir)).exists());
}
