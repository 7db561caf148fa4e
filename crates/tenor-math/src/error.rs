//! Numerical errors.

use thiserror::Error;

/// Result alias for the numerical layer.
pub type MathResult<T> = Result<T, MathError>;

/// Failures of solvers and interpolators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The solver ran out of iterations or function evaluations.
    #[error("No convergence after {iterations} iterations (residual {residual:.2e})")]
    ConvergenceFailed {
        /// Iterations or evaluations spent.
        iterations: u32,
        /// Smallest residual seen.
        residual: f64,
    },

    /// The objective has the same sign at both ends of the bracket.
    #[error("Root not bracketed: g({lower}) = {g_lower:.2e}, g({upper}) = {g_upper:.2e}")]
    InvalidBracket {
        /// Lower end.
        lower: f64,
        /// Upper end.
        upper: f64,
        /// Objective at the lower end.
        g_lower: f64,
        /// Objective at the upper end.
        g_upper: f64,
    },

    /// A query outside the node range of an interpolator that does not
    /// extrapolate.
    #[error("{x} is outside the node range [{min}, {max}]")]
    OutOfRange {
        /// Queried coordinate.
        x: f64,
        /// First node.
        min: f64,
        /// Last node.
        max: f64,
    },

    /// Too few nodes.
    #[error("Need at least {required} nodes, got {actual}")]
    InsufficientData {
        /// Minimum node count.
        required: usize,
        /// Nodes supplied.
        actual: usize,
    },

    /// Arguments the routine cannot work with.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Convergence failure after `iterations` with the given residual.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Invalid arguments.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Too few nodes.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// True when a wider or different bracket might succeed.
    #[must_use]
    pub fn is_bracket_failure(&self) -> bool {
        matches!(self, Self::InvalidBracket { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = MathError::convergence_failed(100, 1e-6);
        assert!(err.to_string().contains("100 iterations"));

        let err = MathError::OutOfRange {
            x: 5.0,
            min: 0.0,
            max: 2.0,
        };
        assert!(err.to_string().contains("[0, 2]"));
        assert!(!err.is_bracket_failure());
    }
}
