//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! Every payoff maps a simulated terminal price S_T to a non-negative cash
//! amount paid at maturity.
//!
//! ## Vanilla European Options
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! ## Digital (cash-or-nothing) Options
//! - **Call**: Q if S_T > K, else 0
//! - **Put**: Q if S_T < K, else 0
//!
//! # Extending
//!
//! The engine is generic over [`Payoff`], so a new contract only needs an
//! `evaluate` implementation.

use crate::error::{PricerError, PricerResult};
use std::fmt;

/// Pure terminal-price payoff
///
/// Implementations must return a value ≥ 0 for every `terminal_price ≥ 0`.
/// `Send + Sync` lets the engine share one payoff across workers.
pub trait Payoff: Send + Sync {
    fn evaluate(&self, terminal_price: f64) -> f64;

    /// Short label used in logs and reports
    fn name(&self) -> &str {
        "payoff"
    }
}

impl<P: Payoff + ?Sized> Payoff for &P {
    #[inline]
    fn evaluate(&self, terminal_price: f64) -> f64 {
        (**self).evaluate(terminal_price)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Payoff + ?Sized> Payoff for Box<P> {
    #[inline]
    fn evaluate(&self, terminal_price: f64) -> f64 {
        (**self).evaluate(terminal_price)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

fn validate_strike(payoff_type: &str, k: f64) -> PricerResult<()> {
    if !k.is_finite() || k <= 0.0 {
        return Err(PricerError::InvalidPayoff {
            payoff_type: payoff_type.to_string(),
            reason: format!("strike must be positive and finite, got {}", k),
        });
    }
    Ok(())
}

/// Vanilla European payoffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VanillaPayoff {
    /// European call option: max(S_T - K, 0)
    Call { k: f64 },

    /// European put option: max(K - S_T, 0)
    Put { k: f64 },
}

impl VanillaPayoff {
    pub fn call(k: f64) -> PricerResult<Self> {
        validate_strike("call", k)?;
        Ok(VanillaPayoff::Call { k })
    }

    pub fn put(k: f64) -> PricerResult<Self> {
        validate_strike("put", k)?;
        Ok(VanillaPayoff::Put { k })
    }

    pub fn strike(&self) -> f64 {
        match *self {
            VanillaPayoff::Call { k } | VanillaPayoff::Put { k } => k,
        }
    }
}

impl Payoff for VanillaPayoff {
    #[inline]
    fn evaluate(&self, terminal_price: f64) -> f64 {
        match *self {
            VanillaPayoff::Call { k } => (terminal_price - k).max(0.0),
            VanillaPayoff::Put { k } => (k - terminal_price).max(0.0),
        }
    }

    fn name(&self) -> &str {
        match self {
            VanillaPayoff::Call { .. } => "call",
            VanillaPayoff::Put { .. } => "put",
        }
    }
}

impl fmt::Display for VanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VanillaPayoff::Call { k } => write!(f, "European call (K={})", k),
            VanillaPayoff::Put { k } => write!(f, "European put (K={})", k),
        }
    }
}

/// Which side of the strike a digital pays on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitalKind {
    Call,
    Put,
}

/// Cash-or-nothing digital payoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalPayoff {
    kind: DigitalKind,
    k: f64,
    cash: f64,
}

impl DigitalPayoff {
    pub fn new(kind: DigitalKind, k: f64, cash: f64) -> PricerResult<Self> {
        validate_strike("digital", k)?;
        if !cash.is_finite() || cash < 0.0 {
            return Err(PricerError::InvalidPayoff {
                payoff_type: "digital".to_string(),
                reason: format!("cash amount must be non-negative and finite, got {}", cash),
            });
        }
        Ok(DigitalPayoff { kind, k, cash })
    }
}

impl Payoff for DigitalPayoff {
    #[inline]
    fn evaluate(&self, terminal_price: f64) -> f64 {
        let in_the_money = match self.kind {
            DigitalKind::Call => terminal_price > self.k,
            DigitalKind::Put => terminal_price < self.k,
        };
        if in_the_money {
            self.cash
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        match self.kind {
            DigitalKind::Call => "digital call",
            DigitalKind::Put => "digital put",
        }
    }
}
