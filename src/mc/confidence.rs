// src/mc/confidence.rs
//! Confidence level → z-score
//!
//! The engine uses a fixed three-entry table, not a general inverse normal
//! CDF, and applies the large-sample normal approximation for every N (no
//! Student-t correction for small samples). Levels other than 90% and 99%,
//! including unrecognized ones, get the 95% z-score without error.
//!
//! [`exact_z_score`] computes the two-sided quantile from `statrs`. It is
//! fallible (the level must lie in (0, 1)), so swapping it into
//! `MonteCarloResult::from_stats` means calling it with `?` there.

use crate::error::{PricerError, PricerResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Tolerance when matching a requested level against the table
pub const LEVEL_TOLERANCE: f64 = 1e-9;

pub const Z_90: f64 = 1.645;
pub const Z_95: f64 = 1.96;
pub const Z_99: f64 = 2.576;

/// The confidence levels the lookup table recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidenceLevel {
    Ninety,
    #[default]
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    /// Map a requested level onto the table; unknown levels become 95%
    pub fn from_level(level: f64) -> Self {
        if (level - 0.90).abs() <= LEVEL_TOLERANCE {
            ConfidenceLevel::Ninety
        } else if (level - 0.99).abs() <= LEVEL_TOLERANCE {
            ConfidenceLevel::NinetyNine
        } else {
            ConfidenceLevel::NinetyFive
        }
    }

    pub fn level(self) -> f64 {
        match self {
            ConfidenceLevel::Ninety => 0.90,
            ConfidenceLevel::NinetyFive => 0.95,
            ConfidenceLevel::NinetyNine => 0.99,
        }
    }

    pub fn z_score(self) -> f64 {
        match self {
            ConfidenceLevel::Ninety => Z_90,
            ConfidenceLevel::NinetyFive => Z_95,
            ConfidenceLevel::NinetyNine => Z_99,
        }
    }

    /// Whole-number percentage, for report headers
    pub fn percent(self) -> u32 {
        match self {
            ConfidenceLevel::Ninety => 90,
            ConfidenceLevel::NinetyFive => 95,
            ConfidenceLevel::NinetyNine => 99,
        }
    }
}

/// Table z-score for a requested two-sided confidence level
pub fn z_score(level: f64) -> f64 {
    ConfidenceLevel::from_level(level).z_score()
}

/// Exact two-sided z-score Φ⁻¹((1 + level) / 2)
pub fn exact_z_score(level: f64) -> PricerResult<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(PricerError::InvalidConfiguration {
            field: "confidence_level".to_string(),
            reason: format!("must lie strictly between 0 and 1, got {}", level),
        });
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| PricerError::NumericalInstability {
        method: "exact_z_score".to_string(),
        reason: e.to_string(),
    })?;
    Ok(normal.inverse_cdf(0.5 * (1.0 + level)))
}
