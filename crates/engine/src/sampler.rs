//! Sampling used to decide when opportunistic cache maintenance runs.

/// Decides whether a probabilistic side effect fires on this call.
pub trait MaintenanceSampler: Send + Sync {
    fn sample(&self, probability: f64) -> bool;
}

/// Samples from the thread-local random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl MaintenanceSampler for RandomSampler {
    fn sample(&self, probability: f64) -> bool {
        probability > 0.0 && rand::random::<f64>() < probability
    }
}

/// Returns the same answer every time. Used to make maintenance deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(bool);

impl FixedSampler {
    pub fn always() -> Self {
        Self(true)
    }

    pub fn never() -> Self {
        Self(false)
    }
}

impl MaintenanceSampler for FixedSampler {
    fn sample(&self, _probability: f64) -> bool {
        self.0
    }
}
