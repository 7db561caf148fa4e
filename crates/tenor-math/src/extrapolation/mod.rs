//! Extrapolation beyond the first or last interpolation node.
//!
//! - [`FlatExtrapolator`]: holds the boundary value
//! - [`LinearExtrapolator`]: continues the boundary slope
//!
//! Both work on either side of the data; `boundary_t` is whichever end the
//! query has crossed.
//!
//! # Example
//!
//! ```rust
//! use tenor_math::extrapolation::{Extrapolator, LinearExtrapolator};
//!
//! let v = LinearExtrapolator.extrapolate(12.0, 10.0, 0.05, 0.001);
//! assert!((v - 0.052).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Trait for extrapolation methods.
pub trait Extrapolator: Send + Sync {
    /// Extrapolates to `t` from the boundary node.
    ///
    /// # Arguments
    ///
    /// * `t` - Query coordinate outside the node range
    /// * `boundary_t` - Coordinate of the crossed boundary node
    /// * `boundary_value` - Value at that node
    /// * `boundary_slope` - Derivative at that node
    fn extrapolate(&self, t: f64, boundary_t: f64, boundary_value: f64, boundary_slope: f64)
        -> f64;

    /// Returns the name of the extrapolation method.
    fn name(&self) -> &'static str;
}

/// Constant continuation of the boundary value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatExtrapolator;

impl Extrapolator for FlatExtrapolator {
    fn extrapolate(&self, _t: f64, _boundary_t: f64, boundary_value: f64, _slope: f64) -> f64 {
        boundary_value
    }

    fn name(&self) -> &'static str {
        "Flat"
    }
}

/// Straight-line continuation with the boundary slope.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolator;

impl Extrapolator for LinearExtrapolator {
    fn extrapolate(&self, t: f64, boundary_t: f64, boundary_value: f64, slope: f64) -> f64 {
        boundary_value + slope * (t - boundary_t)
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

/// Selects an extrapolator in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtrapolationMethod {
    /// Constant value from boundary
    Flat,
    /// Linear continuation with boundary slope
    #[default]
    Linear,
}

impl ExtrapolationMethod {
    /// Returns the extrapolator for this method.
    #[must_use]
    pub fn extrapolator(&self) -> &'static dyn Extrapolator {
        match self {
            ExtrapolationMethod::Flat => &FlatExtrapolator,
            ExtrapolationMethod::Linear => &LinearExtrapolator,
        }
    }
}
