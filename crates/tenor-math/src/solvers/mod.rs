//! Root-finding algorithms.
//!
//! Calibration only needs derivative-free scalar solving:
//!
//! - [`brent`]: Brent's method on a bracket `[a, b]` with `f(a)·f(b) <= 0`
//! - [`solve`]: finds `x` with `f(x) = target` inside `[lower, upper]`,
//!   validating the bracket first
//! - [`solve_from_guess`]: grows a bracket from a guess and a step by the
//!   golden ratio, then hands it to Brent
//!
//! # Example
//!
//! ```rust
//! use tenor_math::solvers::{solve, SolverConfig};
//!
//! // Discount factor whose simple 1Y rate is 5%
//! let rate = |df: f64| 1.0 / df - 1.0;
//! let result = solve(rate, 0.05, 0.5, 1.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 1.0 / 1.05).abs() < 1e-10);
//! ```

mod bracket;
mod brent;

pub use bracket::{solve, solve_from_guess, GOLDEN_GROWTH, MAX_FUNCTION_EVALUATIONS};
pub use brent::brent;

/// Tolerance used when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Stopping rules shared by the solvers.
///
/// Brent stops once the bracket is narrower than `tolerance` or the
/// objective is within `tolerance` of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Absolute tolerance on the root and on the residual.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
    }
}

impl SolverConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Replaces the tolerance.
    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Replaces the iteration cap.
    #[must_use]
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// Root location.
    pub root: f64,
    /// Iterations spent.
    pub iterations: u32,
    /// Objective value at the root.
    pub residual: f64,
}
