// src/mc/stats.rs
//! Streaming sample statistics
//!
//! Welford's single-pass update keeps the mean and the sum of squared
//! deviations (M2) without storing samples:
//! ```text
//! δ      = x - mean
//! mean' = mean + δ / n
//! M2'   = M2 + δ (x - mean')
//! ```
//! Two accumulators combine with Chan et al.'s pairwise formula:
//! ```text
//! n   = n_a + n_b,   δ = mean_b - mean_a
//! mean = mean_a + δ n_b / n
//! M2   = M2_a + M2_b + δ² n_a n_b / n
//! ```
//! which is associative, so per-worker partials can be reduced in any grouping.

/// Running count, mean and M2
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Combine two partial accumulators
    pub fn merge(&self, other: &RunningStats) -> RunningStats {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let count = self.count + other.count;
        let n = count as f64;
        let delta = other.mean - self.mean;
        RunningStats {
            count,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sample mean; 0 for an empty accumulator
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance (N-1 divisor); 0 when N ≤ 1
    pub fn sample_variance(&self) -> f64 {
        if self.count <= 1 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).max(0.0)
        }
    }

    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// Standard deviation of the sample mean
    pub fn standard_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sample_std_dev() / (self.count as f64).sqrt()
        }
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        stats.extend(iter);
        stats
    }
}
