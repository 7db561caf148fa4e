//! Error types for curve construction and queries.
//!
//! Failures fall into a few families: invalid input detected before any
//! calibration, calibration failure, missing or unready dependencies,
//! numerical faults, and query errors on a built curve.

use tenor_core::CoreError;
use tenor_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// The instrument set failed validation.
    #[error("Invalid instrument set: {reason}")]
    InvalidInstrumentSet {
        /// What was wrong with the set.
        reason: String,
    },

    /// A single instrument cannot be used.
    #[error("Invalid instrument {instrument}: {reason}")]
    InvalidInstrument {
        /// Instrument identifier.
        instrument: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Curve points are not strictly increasing.
    #[error("Non-monotonic points at index {index}: {previous} >= {current}")]
    NonMonotonicPoints {
        /// Index of the offending point.
        index: usize,
        /// Coordinate of the preceding point.
        previous: String,
        /// Coordinate of the offending point.
        current: String,
    },

    /// Not enough points to build the requested structure.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Configuration could not be resolved or is inconsistent.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// A point kind the curve cannot evaluate.
    #[error("Invalid point: {reason}")]
    InvalidPoint {
        /// Description of the problem.
        reason: String,
    },

    /// Solving for a curve point failed.
    #[error(
        "Calibration failed for {instrument} after {iterations} iterations (residual: {residual:.2e}): {message}"
    )]
    CalibrationFailure {
        /// Instrument whose point could not be solved.
        instrument: String,
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
        /// Description of failure.
        message: String,
    },

    /// A curve this one depends on is missing or not built.
    #[error("Dependency not ready: {curve}")]
    DependencyNotReady {
        /// Identifier of the dependency.
        curve: String,
    },

    /// Division by an exact zero.
    #[error("Division by zero: {context}")]
    DivisionByZero {
        /// Where the division happened.
        context: String,
    },

    /// A year fraction of zero where a rate needs a positive horizon.
    #[error("Zero year fraction: {context}")]
    ZeroYearFraction {
        /// Where the year fraction arose.
        context: String,
    },

    /// Query outside the calibrated range on a curve that forbids extrapolation.
    #[error("Extrapolation not permitted: {coordinate:.6} is outside [{min:.6}, {max:.6}]")]
    ExtrapolationNotPermitted {
        /// The requested time coordinate.
        coordinate: f64,
        /// First calibrated coordinate.
        min: f64,
        /// Last calibrated coordinate.
        max: f64,
    },

    /// The curve has no calibrated state yet.
    #[error("Curve not ready: {curve}")]
    CurveNotReady {
        /// Curve identifier.
        curve: String,
    },

    /// Error from the numerical layer.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from dates or conventions.
    #[error("{0}")]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid instrument set error.
    #[must_use]
    pub fn invalid_set(reason: impl Into<String>) -> Self {
        Self::InvalidInstrumentSet {
            reason: reason.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failed(
        instrument: impl Into<String>,
        iterations: u32,
        residual: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::CalibrationFailure {
            instrument: instrument.into(),
            iterations,
            residual,
            message: message.into(),
        }
    }

    /// Creates a dependency-not-ready error.
    #[must_use]
    pub fn dependency_not_ready(curve: impl Into<String>) -> Self {
        Self::DependencyNotReady {
            curve: curve.into(),
        }
    }

    /// Creates a division-by-zero error.
    #[must_use]
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// Creates a zero year fraction error.
    #[must_use]
    pub fn zero_year_fraction(context: impl Into<String>) -> Self {
        Self::ZeroYearFraction {
            context: context.into(),
        }
    }

    /// Creates an invalid point error.
    #[must_use]
    pub fn invalid_point(reason: impl Into<String>) -> Self {
        Self::InvalidPoint {
            reason: reason.into(),
        }
    }

    /// True for errors raised before calibration starts.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInstrumentSet { .. }
                | Self::InvalidInstrument { .. }
                | Self::NonMonotonicPoints { .. }
                | Self::InsufficientPoints { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::calibration_failed("USD-Swap-5Y", 100, 1e-6, "no root");
        let msg = format!("{}", err);
        assert!(msg.contains("USD-Swap-5Y"));
        assert!(msg.contains("100 iterations"));

        let err = CurveError::ExtrapolationNotPermitted {
            coordinate: 2.5,
            min: 0.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("2.500000"));
    }

    #[test]
    fn test_math_error_conversion() {
        let err: CurveError = MathError::convergence_failed(10, 0.1).into();
        assert!(matches!(err, CurveError::Math(_)));
        assert!(!err.is_invalid_input());
        assert!(CurveError::invalid_set("empty").is_invalid_input());
    }
}
