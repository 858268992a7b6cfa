// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design
//!
//! Every consumer of standard-normal draws owns its generator:
//! 1. **Reproducibility**: an explicit seed gives an identical draw stream
//! 2. **Parallel safety**: each worker gets its own stream from [`RngFactory`],
//!    so the hot loop never touches shared state or a lock
//! 3. **Divergence by default**: unseeded generators take their seed from the
//!    wall clock, so two process runs produce different estimates
//!
//! Draws come from `rand_distr::StandardNormal` (Ziggurat) over `StdRng`.
//! Neither allocates per draw.

use crate::error::{PricerError, PricerResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::cell::RefCell;

/// Anything that can hand out independent N(0,1) draws
pub trait NormalSource {
    fn next_standard_normal(&mut self) -> f64;
}

/// Seed derived from the current wall-clock time in nanoseconds
pub fn time_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .map(|ns| ns as u64)
        .unwrap_or_else(|| now.timestamp_micros() as u64)
}

/// `StdRng`-backed standard-normal generator
#[derive(Debug, Clone)]
pub struct NormalRng {
    rng: StdRng,
}

impl NormalRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the wall clock (not reproducible)
    pub fn from_time() -> Self {
        Self::seed_from_u64(time_seed())
    }
}

impl NormalSource for NormalRng {
    #[inline]
    fn next_standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn next_standard_normal(&mut self) -> f64 {
        (**self).next_standard_normal()
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end
///
/// Deterministic stand-in for a real generator in tests and reproductions.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(draws: Vec<f64>) -> PricerResult<Self> {
        if draws.is_empty() {
            return Err(PricerError::InvalidConfiguration {
                field: "draws".to_string(),
                reason: "replay source needs at least one draw".to_string(),
            });
        }
        Ok(Self { draws, cursor: 0 })
    }

    /// Number of draws handed out so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl NormalSource for ReplaySource {
    fn next_standard_normal(&mut self) -> f64 {
        let z = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        z
    }
}

/// Factory for independent per-worker streams
///
/// Worker `i` gets `StdRng::seed_from_u64(base_seed + i)`; `seed_from_u64`
/// scrambles the seed through PCG32, so adjacent seeds give unrelated streams.
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Seeded factory when `seed` is given, wall-clock seeded otherwise
    pub fn from_seed_or_time(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(time_seed))
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Independent generator for one worker
    pub fn worker_rng(&self, worker_id: u64) -> NormalRng {
        NormalRng::seed_from_u64(self.base_seed.wrapping_add(worker_id))
    }
}

thread_local! {
    static DEFAULT_SOURCE: RefCell<NormalRng> = RefCell::new(NormalRng::from_time());
}

/// Draw from this thread's lazily-initialized, time-seeded generator
pub fn next_standard_normal() -> f64 {
    DEFAULT_SOURCE.with(|rng| rng.borrow_mut().next_standard_normal())
}

/// Adapter exposing the thread-local generator as a [`NormalSource`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadLocalSource;

impl NormalSource for ThreadLocalSource {
    #[inline]
    fn next_standard_normal(&mut self) -> f64 {
        next_standard_normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments(samples: &[f64]) -> (f64, f64) {
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        (mean, variance)
    }

    #[test]
    fn test_seeded_reproducibility() {
        let mut rng1 = NormalRng::seed_from_u64(42);
        let mut rng2 = NormalRng::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(
                rng1.next_standard_normal().to_bits(),
                rng2.next_standard_normal().to_bits()
            );
        }
    }

    #[test]
    fn test_factory_worker_streams_differ() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.worker_rng(0);
        let mut rng2 = factory.worker_rng(1);

        let vals1: Vec<f64> = (0..10).map(|_| rng1.next_standard_normal()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.next_standard_normal()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_normal_distribution() {
        let mut rng = NormalRng::seed_from_u64(7);
        let samples: Vec<f64> = (0..50_000).map(|_| rng.next_standard_normal()).collect();

        let (mean, variance) = moments(&samples);

        assert!(mean.abs() < 0.03, "Mean should be close to 0, got {}", mean);
        assert!(
            (variance - 1.0).abs() < 0.03,
            "Variance should be close to 1, got {}",
            variance
        );
    }

    #[test]
    fn test_thread_local_source_is_standard_normal() {
        let mut source = ThreadLocalSource;
        let samples: Vec<f64> = (0..50_000).map(|_| source.next_standard_normal()).collect();

        let (mean, variance) = moments(&samples);

        assert!(mean.abs() < 0.03, "Mean should be close to 0, got {}", mean);
        assert!((variance - 1.0).abs() < 0.03, "Variance should be close to 1, got {}", variance);
    }

    #[test]
    fn test_replay_source_wraps() {
        let mut source = ReplaySource::new(vec![0.5, -1.0]).unwrap();
        let drawn: Vec<f64> = (0..5).map(|_| source.next_standard_normal()).collect();
        assert_eq!(drawn, vec![0.5, -1.0, 0.5, -1.0, 0.5]);
        assert_eq!(source.consumed(), 5);
    }

    #[test]
    fn test_replay_source_rejects_empty() {
        assert!(matches!(
            ReplaySource::new(Vec::new()),
            Err(PricerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_seed_or_time() {
        assert_eq!(RngFactory::from_seed_or_time(Some(9)).base_seed(), 9);
        assert!(time_seed() > 0);
    }
}
