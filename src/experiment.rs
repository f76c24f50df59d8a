//! Tools for running experiments with multiple simulation runs.

use std::fs;
use std::fs::File;
use std::sync::{Arc, Mutex};

use dyn_clone::{clone_trait_object, DynClone};
use indexmap::map::IndexMap;
use log::Level;
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;

use crate::core::config::SimulationConfig;
use crate::core::load_model::ConstantLoadModel;
use crate::core::logger::{FileLogger, Logger, StdoutLogger};
use crate::core::vm::VirtualMachine;
use crate::datacenter::{Datacenter, PlacementResult};
use crate::extensions::dataset_reader::DatasetReader;
use crate::extensions::random_workload::RandomWorkload;

/// Trait for implementing custom callbacks for simulation runs within an
/// experiment.
pub trait SimulationCallbacks: DynClone + Send {
    /// Runs before starting a simulation run.
    fn on_run_start(&mut self, _dc: &mut Datacenter) {}

    /// Runs after each step of a simulation run, returns false if the run
    /// must be stopped.
    fn on_step(&mut self, _dc: &mut Datacenter, _time: f64) -> bool {
        true
    }

    /// Runs upon the completion of a simulation run, returns results of
    /// this run.
    fn on_run_finish(&mut self, _dc: &mut Datacenter) -> IndexMap<String, String> {
        IndexMap::new()
    }
}

clone_trait_object!(SimulationCallbacks);

/// Implements execution of an experiment as a set of independent simulation
/// runs, one datacenter per run.
pub struct Experiment {
    pub runs: Vec<SimulationConfig>,
    pub callbacks: Box<dyn SimulationCallbacks>,
    pub log_dir: Option<String>,
    pub log_level: Level,
}

impl Experiment {
    pub fn new(
        runs: Vec<SimulationConfig>,
        callbacks: Box<dyn SimulationCallbacks>,
        log_dir: Option<String>,
        log_level: Level,
    ) -> Self {
        if let Some(dir) = log_dir.clone() {
            fs::create_dir_all(dir).unwrap();
        }

        Self {
            runs,
            callbacks,
            log_dir,
            log_level,
        }
    }

    /// Runs the experiment using the specified number of threads and writes
    /// `results.json` to the log directory, if one is set.
    pub fn run(&mut self, num_threads: usize) {
        let _ = env_logger::try_init();
        let results = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::new(num_threads);

        for (index, run_config) in self.runs.iter().enumerate() {
            let run_id = index + 1;
            let run_config = run_config.clone();
            let mut callbacks = self.callbacks.clone();
            let log_level = self.log_level;
            let log_file = self.log_dir.clone().map(|dir| format!("{}/log_{}.csv", dir, run_id));
            let results = results.clone();

            pool.execute(move || {
                println!("RUN {}: {:?}", run_id, run_config);
                let run_results = run_simulation(run_id, run_config.clone(), &mut callbacks, log_file, log_level);

                let mut run_entry = IndexMap::<String, DictValue>::new();
                run_entry.insert("id".to_string(), DictValue::String(format!("{}", run_id)));
                run_entry.insert("config".to_string(), DictValue::Config(run_config));
                run_entry.insert("results".to_string(), DictValue::StringDict(run_results));
                results.lock().unwrap().push(run_entry);
            });
        }

        pool.join();
        let results = Arc::try_unwrap(results).unwrap().into_inner().unwrap();

        if let Some(dir) = self.log_dir.clone() {
            let mut file = File::create(format!("{}/results.json", dir)).unwrap();
            serde_json::to_writer_pretty(&mut file, &results).unwrap();
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
enum DictValue {
    String(String),
    StringDict(IndexMap<String, String>),
    Config(SimulationConfig),
}

/// Executes one simulation run: builds the datacenter from config, submits
/// the workload as it arrives, destroys VMs whose lifetime expired and
/// ticks the telemetry until the configured horizon.
fn run_simulation(
    run_id: usize,
    config: SimulationConfig,
    callbacks: &mut Box<dyn SimulationCallbacks>,
    log_file: Option<String>,
    log_level: Level,
) -> IndexMap<String, String> {
    let logger: Box<dyn Logger> = if log_file.is_some() {
        Box::new(FileLogger::with_level(log_level))
    } else {
        Box::new(StdoutLogger::new())
    };

    let mut dc = Datacenter::from_config_with_logger(&config, logger);
    callbacks.on_run_start(&mut dc);

    let mut workload = config
        .workload
        .as_ref()
        .map(|workload_config| RandomWorkload::new(workload_config, config.seed));
    let mut next_request = workload.as_mut().and_then(|w| w.next_request());

    // (vm id, time the lifetime expires)
    let mut running: Vec<(u32, f64)> = Vec::new();
    let mut time = 0.;

    while time <= config.simulation_length {
        running.retain(|(vm_id, end_time)| {
            if *end_time <= time {
                dc.destroy_vm(*vm_id);
                false
            } else {
                true
            }
        });

        while next_request.as_ref().map_or(false, |r| r.arrival_time <= time) {
            let request = next_request.take().unwrap();
            let vm = VirtualMachine::new(
                request.id,
                request.pes,
                request.mips_per_pe,
                request.memory,
                request.bandwidth,
                request.storage,
                Box::new(ConstantLoadModel::new(1.)),
            );
            if let PlacementResult::Placed { .. } = dc.submit_vm(vm) {
                running.push((request.id, time + request.lifetime));
            }
            next_request = workload.as_mut().and_then(|w| w.next_request());
        }

        dc.tick(time);
        if !callbacks.on_step(&mut dc, time) {
            break;
        }
        time += config.step_duration;
    }

    if let Some(log_file) = log_file {
        match dc.save_log(&log_file) {
            Ok(_) => println!("Log for run {run_id} saved successfully to file: {log_file}"),
            Err(e) => println!("Error while saving log for run {run_id}: {e:?}"),
        }
    }

    callbacks.on_run_finish(&mut dc)
}
