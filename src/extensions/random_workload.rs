//! Seeded random workload generation.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::core::config::RandomWorkloadConfig;
use crate::extensions::dataset_reader::{DatasetReader, VmRequest};

/// Generates a workload of VM requests with requirements drawn uniformly
/// from the configured ranges.
///
/// The generator is seeded explicitly, so the same config and seed always
/// produce the same workload.
pub struct RandomWorkload {
    requests: Vec<VmRequest>,
    current: usize,
}

impl RandomWorkload {
    pub fn new(config: &RandomWorkloadConfig, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut requests = Vec::with_capacity(config.vm_count as usize);
        for i in 0..config.vm_count {
            requests.push(VmRequest {
                id: i + 1,
                pes: sample_u32(&mut rng, config.pes),
                mips_per_pe: sample_u32(&mut rng, config.mips_per_pe),
                memory: sample_u64(&mut rng, config.memory),
                bandwidth: sample_u64(&mut rng, config.bandwidth),
                storage: sample_u64(&mut rng, config.storage),
                arrival_time: sample_f64(&mut rng, config.arrival_time),
                lifetime: sample_f64(&mut rng, config.lifetime),
            });
        }
        requests.sort_by(|a, b| a.arrival_time.partial_cmp(&b.arrival_time).unwrap());
        Self { requests, current: 0 }
    }
}

impl DatasetReader for RandomWorkload {
    fn next_request(&mut self) -> Option<VmRequest> {
        if self.current >= self.requests.len() {
            return None;
        }
        self.current += 1;
        Some(self.requests[self.current - 1].clone())
    }
}

fn sample_u32(rng: &mut Pcg64, (min, max): (u32, u32)) -> u32 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

fn sample_u64(rng: &mut Pcg64, (min, max): (u64, u64)) -> u64 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

fn sample_f64(rng: &mut Pcg64, (min, max): (f64, f64)) -> f64 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..max)
    }
}
