//! Resource load models.

use std::cell::RefCell;

use dyn_clone::{clone_trait_object, DynClone};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// A resource load model is a function, which defines the load of a resource
/// at the given moment. `time` is the current simulation time,
/// `time_from_start` is the time since the VM was placed.
pub trait LoadModel: DynClone {
    fn get_resource_load(&self, time: f64, time_from_start: f64) -> f64;
}

clone_trait_object!(LoadModel);

/// The simplest load model, the constant load.
#[derive(Clone)]
pub struct ConstantLoadModel {
    load: f64,
}

impl ConstantLoadModel {
    pub fn new(load: f64) -> Self {
        Self { load }
    }
}

impl LoadModel for ConstantLoadModel {
    fn get_resource_load(&self, _time: f64, _time_from_start: f64) -> f64 {
        self.load
    }
}

/// Uniformly random load within `[min_load, max_load]`.
///
/// The generator is owned by the model and seeded explicitly, so a run with
/// a fixed seed replays the same load sequence.
#[derive(Clone)]
pub struct RandomLoadModel {
    min_load: f64,
    max_load: f64,
    rng: RefCell<Pcg64>,
}

impl RandomLoadModel {
    pub fn new(min_load: f64, max_load: f64, seed: u64) -> Self {
        Self {
            min_load,
            max_load,
            rng: RefCell::new(Pcg64::seed_from_u64(seed)),
        }
    }
}

impl LoadModel for RandomLoadModel {
    fn get_resource_load(&self, _time: f64, _time_from_start: f64) -> f64 {
        if self.min_load >= self.max_load {
            return self.min_load;
        }
        self.rng.borrow_mut().gen_range(self.min_load..self.max_load)
    }
}
