// src/mc/mc_engine.rs
use crate::error::{validation::*, PricerError, PricerResult};
use crate::market::MarketParameters;
use crate::mc::confidence::z_score;
use crate::mc::payoffs::Payoff;
use crate::mc::stats::RunningStats;
use crate::models::gbm::Gbm;
use crate::rng::{NormalSource, RngFactory};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Engine run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct McConfig {
    pub paths: usize,
    /// Two-sided confidence level; see [`crate::mc::confidence`]
    pub confidence_level: f64,
    /// Base seed. `None` seeds from the wall clock.
    pub seed: Option<u64>,
    /// Number of independent worker streams. 1 runs on the calling thread.
    pub workers: usize,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> PricerResult<()> {
        validate_paths(self.paths)?;
        validate_workers(self.workers)?;
        Ok(())
    }

    /// Same configuration spread over every logical CPU
    pub fn with_all_cores(mut self) -> Self {
        self.workers = num_cpus::get().max(1);
        self
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 1_000_000,
            confidence_level: 0.95,
            seed: None,
            workers: 1,
        }
    }
}

/// Price estimate with its sampling uncertainty
///
/// Always satisfies `ci_lower <= price <= ci_upper` and `standard_error >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonteCarloResult {
    pub price: f64,
    pub standard_error: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl MonteCarloResult {
    /// Build the result from discounted-payoff statistics
    pub fn from_stats(stats: &RunningStats, confidence_level: f64) -> PricerResult<Self> {
        let price = stats.mean();
        let standard_error = stats.standard_error();

        if !price.is_finite() {
            return Err(PricerError::NumericalInstability {
                method: "Monte Carlo".to_string(),
                reason: format!("Price estimate is not finite: {}", price),
            });
        }
        if !standard_error.is_finite() {
            return Err(PricerError::NumericalInstability {
                method: "Monte Carlo".to_string(),
                reason: format!("Standard error is not finite: {}", standard_error),
            });
        }

        let margin = z_score(confidence_level) * standard_error;
        Ok(MonteCarloResult {
            price,
            standard_error,
            ci_lower: price - margin,
            ci_upper: price + margin,
        })
    }

    /// Margin of error, `z * standard_error`
    pub fn half_width(&self) -> f64 {
        0.5 * (self.ci_upper - self.ci_lower)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.ci_lower <= value && value <= self.ci_upper
    }
}

/// One simulated trial, kept only when raw data is exported
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub terminal_price: f64,
    pub payoff: f64,
    pub discounted_payoff: f64,
}

fn accumulate<P, R>(
    gbm: &Gbm,
    discount: f64,
    payoff: &P,
    paths: usize,
    source: &mut R,
) -> RunningStats
where
    P: Payoff + ?Sized,
    R: NormalSource + ?Sized,
{
    let mut stats = RunningStats::new();
    for _ in 0..paths {
        let s_t = gbm.terminal_price(source.next_standard_normal());
        stats.push(discount * payoff.evaluate(s_t));
    }
    stats
}

fn warn_if_degenerate(paths: usize) {
    if paths == 1 {
        warn!(
            "single trial: standard error is reported as 0 and the interval collapses to the price"
        );
    }
}

/// Monte Carlo price of a European option under Black-Scholes dynamics
///
/// # Algorithm
///
/// For each of `paths` trials:
/// ```text
/// S_T = S_0 * exp((r - σ²/2)T + σ√T * Z)
/// Y   = e^(-rT) * payoff(S_T)
/// ```
/// then
/// ```text
/// price = mean(Y)
/// SE    = s_Y / √N          (s_Y with the N-1 divisor, 0 when N = 1)
/// CI    = price ± z * SE    (z from the fixed 90/95/99 table)
/// ```
///
/// Runs on the calling thread, consumes exactly `paths` draws from `source`
/// and keeps O(1) state. A fixed draw stream gives a bit-identical result.
///
/// # Errors
///
/// - `InvalidTrialCount` when `paths == 0`
/// - `InvalidMarketParameters` for non-positive spot/maturity, negative
///   volatility or non-finite inputs
pub fn price_european_option<P, R>(
    market: &MarketParameters,
    paths: usize,
    payoff: &P,
    confidence_level: f64,
    source: &mut R,
) -> PricerResult<MonteCarloResult>
where
    P: Payoff + ?Sized,
    R: NormalSource + ?Sized,
{
    market.validate()?;
    validate_paths(paths)?;
    warn_if_degenerate(paths);

    let gbm = Gbm::from_market(market);
    let stats = accumulate(&gbm, market.discount_factor(), payoff, paths, source);
    let result = MonteCarloResult::from_stats(&stats, confidence_level)?;

    debug!(
        payoff = payoff.name(),
        paths,
        price = result.price,
        standard_error = result.standard_error,
        "priced on calling thread"
    );
    Ok(result)
}

/// Split `paths` into `workers` contiguous chunks differing by at most one
fn chunk_sizes(paths: usize, workers: usize) -> Vec<usize> {
    let base = paths / workers;
    let extra = paths % workers;
    (0..workers)
        .map(|w| base + usize::from(w < extra))
        .collect()
}

/// Config-driven pricing, optionally fanned out over rayon workers
///
/// # Parallel Scheme
///
/// Worker `w` simulates its chunk with its own stream
/// `RngFactory(seed).worker_rng(w)` and returns a partial [`RunningStats`].
/// Partials are merged in worker order, so a fixed `(seed, workers, paths)`
/// reproduces bit-for-bit regardless of thread scheduling.
///
/// With `workers == 1` the run is identical to [`price_european_option`] fed
/// with `RngFactory(seed).worker_rng(0)`.
pub fn mc_price_european<P>(
    cfg: &McConfig,
    market: &MarketParameters,
    payoff: &P,
) -> PricerResult<MonteCarloResult>
where
    P: Payoff + ?Sized,
{
    cfg.validate()?;
    market.validate()?;

    let factory = RngFactory::from_seed_or_time(cfg.seed);
    let workers = cfg.workers.min(cfg.paths);

    if workers == 1 {
        let mut rng = factory.worker_rng(0);
        return price_european_option(market, cfg.paths, payoff, cfg.confidence_level, &mut rng);
    }

    warn_if_degenerate(cfg.paths);
    let gbm = Gbm::from_market(market);
    let discount = market.discount_factor();

    let partials: Vec<RunningStats> = chunk_sizes(cfg.paths, workers)
        .into_par_iter()
        .enumerate()
        .map(|(w, chunk)| {
            let mut rng = factory.worker_rng(w as u64);
            accumulate(&gbm, discount, payoff, chunk, &mut rng)
        })
        .collect();

    let stats = partials
        .iter()
        .fold(RunningStats::new(), |acc, part| acc.merge(part));
    let result = MonteCarloResult::from_stats(&stats, cfg.confidence_level)?;

    debug!(
        payoff = payoff.name(),
        paths = cfg.paths,
        workers,
        base_seed = factory.base_seed(),
        price = result.price,
        standard_error = result.standard_error,
        "priced across workers"
    );
    Ok(result)
}

/// Simulate and keep every trial, for raw-data export
///
/// Consumes the same draws in the same order as [`price_european_option`].
pub fn simulate_trials<P, R>(
    market: &MarketParameters,
    paths: usize,
    payoff: &P,
    source: &mut R,
) -> PricerResult<Vec<TrialOutcome>>
where
    P: Payoff + ?Sized,
    R: NormalSource + ?Sized,
{
    market.validate()?;
    validate_paths(paths)?;

    let gbm = Gbm::from_market(market);
    let discount = market.discount_factor();
    let trials = (0..paths)
        .map(|_| {
            let terminal_price = gbm.terminal_price(source.next_standard_normal());
            let value = payoff.evaluate(terminal_price);
            TrialOutcome {
                terminal_price,
                payoff: value,
                discounted_payoff: discount * value,
            }
        })
        .collect();
    Ok(trials)
}
