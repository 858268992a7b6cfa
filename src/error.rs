// src/error.rs
use thiserror::Error;

/// Error types for the mc-pricer library
///
/// Every variant describes a caller-input violation or a reporting failure.
/// The simulation loop itself has no runtime failure mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricerError {
    /// Spot, rate, volatility or maturity outside their valid domain
    #[error("Invalid market parameter '{parameter}' = {value}: {constraint}")]
    InvalidMarketParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Trial count that cannot produce a price
    #[error("Invalid trial count {paths}: {reason}")]
    InvalidTrialCount { paths: usize, reason: String },

    /// Payoff constructed with an invalid strike or cash amount
    #[error("Invalid payoff {payoff_type}: {reason}")]
    InvalidPayoff { payoff_type: String, reason: String },

    /// Invalid engine or reporting configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Non-finite statistics coming out of the engine
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// CSV or file output failure in the reporting layer
    #[error("Report output failed for '{target}': {reason}")]
    Report { target: String, reason: String },
}

impl From<std::io::Error> for PricerError {
    fn from(e: std::io::Error) -> Self {
        PricerError::Report {
            target: "io".to_string(),
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for PricerError {
    fn from(e: csv::Error) -> Self {
        PricerError::Report {
            target: "csv".to_string(),
            reason: e.to_string(),
        }
    }
}

/// Result type alias for mc-pricer operations
pub type PricerResult<T> = Result<T, PricerError>;

/// Validation utilities
pub mod validation {
    use super::{PricerError, PricerResult};

    /// Upper bound on trials per engine call
    pub const MAX_PATHS: usize = 1_000_000_000;

    fn invalid(name: &str, value: f64, constraint: &str) -> PricerError {
        PricerError::InvalidMarketParameters {
            parameter: name.to_string(),
            value,
            constraint: constraint.to_string(),
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricerResult<()> {
        if !value.is_finite() {
            Err(invalid(name, value, "must be finite (not NaN or infinite)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and positive
    pub fn validate_positive(name: &str, value: f64) -> PricerResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(invalid(name, value, "must be positive (> 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricerResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(invalid(name, value, "must be non-negative (≥ 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricerResult<()> {
        if paths == 0 {
            Err(PricerError::InvalidTrialCount {
                paths,
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > MAX_PATHS {
            Err(PricerError::InvalidTrialCount {
                paths,
                reason: format!("exceeds maximum allowed ({})", MAX_PATHS),
            })
        } else {
            Ok(())
        }
    }

    /// Validate worker count for parallel runs
    pub fn validate_workers(workers: usize) -> PricerResult<()> {
        if workers == 0 {
            Err(PricerError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: "must be at least 1".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("spot", 100.0).is_ok());
        assert!(validate_positive("spot", 0.0).is_err());
        assert!(validate_positive("spot", -1.0).is_err());
        assert!(validate_positive("spot", f64::NAN).is_err());
        assert!(validate_positive("spot", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("volatility", 0.0).is_ok());
        assert!(validate_non_negative("volatility", 0.2).is_ok());
        assert!(validate_non_negative("volatility", -0.01).is_err());
    }

    #[test]
    fn test_validate_paths() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(1_000_000).is_ok());
        assert!(matches!(
            validate_paths(0),
            Err(PricerError::InvalidTrialCount { paths: 0, .. })
        ));
        assert!(validate_paths(MAX_PATHS + 1).is_err());
    }

    #[test]
    fn test_validate_workers() {
        assert!(validate_workers(4).is_ok());
        assert!(matches!(
            validate_workers(0),
            Err(PricerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let error = PricerError::InvalidMarketParameters {
            parameter: "maturity".to_string(),
            value: -0.5,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("maturity"));
        assert!(display.contains("-0.5"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_io_error_maps_to_report() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PricerError = io.into();
        assert!(matches!(err, PricerError::Report { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
