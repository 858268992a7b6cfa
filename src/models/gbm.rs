// src/models/gbm.rs
use crate::market::MarketParameters;

/// Geometric Brownian motion sampled exactly at maturity
///
/// Under the risk-neutral measure `dS_t = r S_t dt + σ S_t dW_t` has the
/// closed-form terminal value
/// ```text
/// S_T = S_0 * exp((r - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
/// ```
/// The drift and diffusion terms are precomputed once per run so a trial
/// costs one multiply-add and one `exp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    s0: f64,
    drift: f64,
    diffusion: f64,
}

impl Gbm {
    pub fn from_market(market: &MarketParameters) -> Self {
        let sigma = market.volatility;
        Gbm {
            s0: market.spot,
            drift: (market.rate - 0.5 * sigma * sigma) * market.maturity,
            diffusion: sigma * market.maturity.sqrt(),
        }
    }

    /// Terminal price for one standard-normal draw
    #[inline]
    pub fn terminal_price(&self, normal_draw: f64) -> f64 {
        self.s0 * (self.drift + self.diffusion * normal_draw).exp()
    }
}

/// One-shot form of [`Gbm::terminal_price`]
pub fn simulate_terminal_price(market: &MarketParameters, normal_draw: f64) -> f64 {
    Gbm::from_market(market).terminal_price(normal_draw)
}
