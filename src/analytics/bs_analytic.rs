// src/analytics/bs_analytic.rs
//! Closed-form Black-Scholes prices for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! These are the exact values the Monte Carlo estimator converges to, used as
//! a reference in reports and tests.

use crate::market::MarketParameters;
use crate::math_utils::norm_cdf;

fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// With σ = 0 the price is the discounted intrinsic value of the forward,
/// `max(S - K e^(-rT), 0)`.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if sigma == 0.0 {
        return (s - k * (-r * t).exp()).max(0.0);
    }
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if sigma == 0.0 {
        return (k * (-r * t).exp() - s).max(0.0);
    }
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

/// Right-hand side of put-call parity, `S - K e^(-rT)`
pub fn parity_forward_value(market: &MarketParameters, k: f64) -> f64 {
    market.spot - k * market.discount_factor()
}

/// Call price for a market snapshot
pub fn call_price(market: &MarketParameters, k: f64) -> f64 {
    bs_call_price(market.spot, k, market.rate, market.volatility, market.maturity)
}

/// Put price for a market snapshot
pub fn put_price(market: &MarketParameters, k: f64) -> f64 {
    bs_put_price(market.spot, k, market.rate, market.volatility, market.maturity)
}
