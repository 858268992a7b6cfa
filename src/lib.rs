//! # mc-pricer: Monte Carlo Pricing of European Options
//!
//! Estimates the fair value of European options under Black-Scholes dynamics
//! and reports the estimate with its standard error and confidence interval.
//!
//! ## Key Features
//!
//! - **Exact terminal sampling**: one normal draw per trial, no discretization error
//! - **Streaming statistics**: single-pass Welford accumulator, O(1) memory
//! - **Parallel fan-out**: independent per-worker streams merged deterministically
//! - **Open payoff set**: any type implementing [`mc::payoffs::Payoff`]
//! - **Input validation**: bad trial counts or market data fail fast
//!
//! ## Quick Start
//!
//! ```rust
//! use mc_pricer::market::MarketParameters;
//! use mc_pricer::mc::mc_engine::{mc_price_european, McConfig};
//! use mc_pricer::mc::payoffs::VanillaPayoff;
//!
//! let market = MarketParameters::new(100.0, 0.05, 0.20, 1.0).expect("valid market");
//! let call = VanillaPayoff::call(105.0).expect("valid strike");
//!
//! let cfg = McConfig {
//!     paths: 100_000,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let result = mc_price_european(&cfg, &market, &call).expect("valid configuration");
//! println!(
//!     "Call: {:.4} ± {:.4} (95% CI [{:.4}, {:.4}])",
//!     result.price, result.standard_error, result.ci_lower, result.ci_upper
//! );
//! ```
//!
//! ## Mathematical Foundation
//!
//! Under the risk-neutral measure the terminal price is
//! `S_T = S_0 exp((r - σ²/2)T + σ√T Z)`, and the option value is the
//! discounted expectation `e^(-rT) E[payoff(S_T)]`, estimated by the sample
//! mean over independent trials.

pub mod analytics;
pub mod convergence;
pub mod error;
pub mod market;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

pub use error::{PricerError, PricerResult};
pub use market::MarketParameters;
pub use mc::mc_engine::{mc_price_european, price_european_option, McConfig, MonteCarloResult};
pub use mc::payoffs::{Payoff, VanillaPayoff};
