// src/market.rs
use crate::error::{validation::*, PricerResult};
use serde::Serialize;

/// Market inputs for one simulation run
///
/// Immutable once built. `new` rejects inputs for which the lognormal
/// terminal-price formula is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketParameters {
    /// Initial spot price S₀ (> 0)
    pub spot: f64,
    /// Continuously compounded risk-free rate r
    pub rate: f64,
    /// Annualized volatility σ (≥ 0)
    pub volatility: f64,
    /// Time to maturity T in years (> 0)
    pub maturity: f64,
}

impl MarketParameters {
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> PricerResult<Self> {
        let market = Self {
            spot,
            rate,
            volatility,
            maturity,
        };
        market.validate()?;
        Ok(market)
    }

    /// Validate the market parameters
    pub fn validate(&self) -> PricerResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("volatility", self.volatility)?;
        validate_positive("maturity", self.maturity)?;
        Ok(())
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Risk-neutral forward S₀·e^(rT)
    pub fn forward(&self) -> f64 {
        self.spot * (self.rate * self.maturity).exp()
    }
}

impl Default for MarketParameters {
    fn default() -> Self {
        MarketParameters {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.20,
            maturity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricerError;

    #[test]
    fn test_valid_market() {
        let m = MarketParameters::new(100.0, 0.05, 0.2, 1.0).unwrap();
        assert!((m.discount_factor() - (-0.05f64).exp()).abs() < 1e-15);
        assert!((m.forward() * m.discount_factor() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volatility_allowed() {
        assert!(MarketParameters::new(100.0, 0.05, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(MarketParameters::new(100.0, -0.01, 0.2, 1.0).is_ok());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let cases = [
            (0.0, 0.05, 0.2, 1.0, "spot"),
            (-5.0, 0.05, 0.2, 1.0, "spot"),
            (100.0, f64::NAN, 0.2, 1.0, "rate"),
            (100.0, 0.05, -0.2, 1.0, "volatility"),
            (100.0, 0.05, 0.2, 0.0, "maturity"),
            (100.0, 0.05, 0.2, f64::INFINITY, "maturity"),
        ];
        for (s, r, v, t, field) in cases {
            match MarketParameters::new(s, r, v, t) {
                Err(PricerError::InvalidMarketParameters { parameter, .. }) => {
                    assert_eq!(parameter, field)
                }
                other => panic!("expected rejection of {}, got {:?}", field, other),
            }
        }
    }
}
