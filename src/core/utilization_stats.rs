//! Per-host CPU utilization history.

/// Aggregate statistics over the CPU utilization samples recorded for one
/// host, fed by the simulation clock ticks.
///
/// Aggregates return `None` until the first sample is recorded; there is no
/// meaningful default to report for an empty history. The history is
/// unbounded; callers only go through the accessors, so a bounded-window
/// variant can replace the storage without changing them.
#[derive(Clone, Debug, Default)]
pub struct UtilizationStats {
    samples: Vec<f64>,
}

impl UtilizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a utilization sample, a fraction in `[0, 1]`.
    pub fn record(&mut self, fraction: f64) {
        debug_assert!(
            (0. ..=1.).contains(&fraction),
            "utilization sample out of range: {}",
            fraction
        );
        self.samples.push(fraction);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().cloned().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().cloned().reduce(f64::max)
    }
}
