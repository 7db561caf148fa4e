//! # Tenor Math
//!
//! Numerical building blocks for curve calibration:
//!
//! - **Solvers**: Brent's method on a bracket, target solving with bracket
//!   checks, and bracket expansion from an initial guess
//! - **Interpolation**: Linear, log-linear and natural cubic spline in one
//!   dimension, bilinear on a grid
//! - **Extrapolation**: Flat and linear continuation past the boundary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod extrapolation;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::extrapolation::{
        ExtrapolationMethod, Extrapolator, FlatExtrapolator, LinearExtrapolator,
    };
    pub use crate::interpolation::{
        BilinearInterpolator, CubicSpline, Interpolator, LinearInterpolator,
        LogLinearInterpolator,
    };
    pub use crate::solvers::{
        brent, solve, solve_from_guess, SolverConfig, SolverResult,
        MAX_FUNCTION_EVALUATIONS,
    };
}

pub use error::{MathError, MathResult};
