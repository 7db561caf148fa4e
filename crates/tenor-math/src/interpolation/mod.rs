//! Interpolation methods for curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, for discount factors
//! - [`CubicSpline`]: natural cubic spline (C2)
//! - [`BilinearInterpolator`]: two-dimensional grid, e.g. expiry × strike
//!
//! One-dimensional interpolators reject queries outside `[min_x, max_x]`;
//! extrapolation is layered on top with an
//! [`Extrapolator`](crate::extrapolation::Extrapolator) using the boundary
//! value and [`Interpolator::derivative`].

mod bilinear;
mod cubic_spline;
mod linear;
mod log_linear;

pub use bilinear::BilinearInterpolator;
pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use std::cmp::Ordering;

use crate::error::{MathError, MathResult};

/// Trait for one-dimensional interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks node count, equal lengths and strictly increasing abscissae.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Errors if `x` lies outside the node range.
pub(crate) fn check_range(xs: &[f64], x: f64) -> MathResult<()> {
    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if x < min || x > max || x.is_nan() {
        return Err(MathError::OutOfRange { x, min, max });
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i + 1]]` containing `x`.
pub(crate) fn segment_index(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.binary_search_by(|node| node.partial_cmp(&x).unwrap_or(Ordering::Equal)) {
        Ok(i) => i.min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}
