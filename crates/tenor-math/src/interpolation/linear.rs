//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{check_range, segment_index, validate_nodes, Interpolator};

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use tenor_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        Ok(Self { xs, ys })
    }

    fn segment(&self, x: f64) -> (f64, f64, f64, f64) {
        let i = segment_index(&self.xs, x);
        (self.xs[i], self.xs[i + 1], self.ys[i], self.ys[i + 1])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let (x0, x1, y0, y1) = self.segment(x);
        let w = (x - x0) / (x1 - x0);
        Ok(y0 + w * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let (x0, x1, y0, y1) = self.segment(x);
        Ok((y1 - y0) / (x1 - x0))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
