// src/convergence.rs
//! Convergence study: the engine re-run at increasing trial counts
//!
//! The standard error should shrink like 1/√N, so each tenfold increase in N
//! narrows the interval by roughly √10 ≈ 3.16.

use crate::error::{PricerError, PricerResult};
use crate::market::MarketParameters;
use crate::mc::mc_engine::{mc_price_european, McConfig, MonteCarloResult};
use crate::mc::payoffs::Payoff;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Trial counts used when none are configured
pub const DEFAULT_SIMULATION_COUNTS: [usize; 10] = [
    1_000, 5_000, 10_000, 50_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000, 5_000_000,
];

/// Engine output at one trial count
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    pub simulations: usize,
    pub result: MonteCarloResult,
}

/// Seed for step `index` of a seeded study
///
/// Steps are spaced 2³² apart so no two steps share a worker stream.
fn step_seed(seed: Option<u64>, index: usize) -> Option<u64> {
    seed.map(|s| s.wrapping_add((index as u64) << 32))
}

/// Price `payoff` once per entry of `counts`, in order
///
/// `base` supplies confidence level, seed and workers; its `paths` is ignored.
/// Every step draws fresh random numbers.
pub fn run_convergence<P>(
    base: &McConfig,
    market: &MarketParameters,
    payoff: &P,
    counts: &[usize],
) -> PricerResult<Vec<ConvergencePoint>>
where
    P: Payoff + ?Sized,
{
    if counts.is_empty() {
        return Err(PricerError::InvalidConfiguration {
            field: "simulation_counts".to_string(),
            reason: "at least one trial count is required".to_string(),
        });
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &simulations)| {
            let cfg = McConfig {
                paths: simulations,
                seed: step_seed(base.seed, i),
                ..base.clone()
            };
            let result = mc_price_european(&cfg, market, payoff)?;
            info!(
                payoff = payoff.name(),
                simulations,
                price = result.price,
                standard_error = result.standard_error,
                "convergence step"
            );
            Ok(ConvergencePoint {
                simulations,
                result,
            })
        })
        .collect()
}

/// `<dir>/<prefix>_convergence.csv`
pub fn convergence_csv_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}_convergence.csv", prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::payoffs::VanillaPayoff;

    #[test]
    fn test_runs_every_count_in_order() {
        let market = MarketParameters::default();
        let call = VanillaPayoff::call(105.0).unwrap();
        let base = McConfig {
            seed: Some(17),
            ..Default::default()
        };
        let counts = [200, 2_000, 20_000];

        let points = run_convergence(&base, &market, &call, &counts).unwrap();

        let sims: Vec<usize> = points.iter().map(|p| p.simulations).collect();
        assert_eq!(sims, counts.to_vec());
        assert!(points[2].result.standard_error < points[0].result.standard_error);
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let call = VanillaPayoff::call(105.0).unwrap();
        let err = run_convergence(&McConfig::default(), &MarketParameters::default(), &call, &[])
            .unwrap_err();
        assert!(matches!(err, PricerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_zero_count_propagates() {
        let call = VanillaPayoff::call(105.0).unwrap();
        let base = McConfig {
            seed: Some(1),
            ..Default::default()
        };
        let err =
            run_convergence(&base, &MarketParameters::default(), &call, &[100, 0]).unwrap_err();
        assert!(matches!(err, PricerError::InvalidTrialCount { .. }));
    }

    #[test]
    fn test_step_seeds_are_distinct() {
        assert_eq!(step_seed(None, 3), None);
        assert_ne!(step_seed(Some(5), 0), step_seed(Some(5), 1));
        assert_eq!(step_seed(Some(5), 0), Some(5));
    }

    #[test]
    fn test_csv_path() {
        let p = convergence_csv_path(Path::new("out"), "call_option");
        assert_eq!(p, Path::new("out").join("call_option_convergence.csv"));
    }
}
