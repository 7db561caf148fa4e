//! Log-linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{check_range, segment_index, validate_nodes, Interpolator};

/// Linear interpolation of `ln(y)`.
///
/// On discount factors this gives piecewise-constant instantaneous forward
/// rates. All `y` values must be strictly positive.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        if let Some(bad) = ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {bad}"
            )));
        }
        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self { xs, log_ys })
    }

    fn log_value(&self, x: f64) -> (f64, f64) {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (x1 - x0);
        (self.log_ys[i] + slope * (x - x0), slope)
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        Ok(self.log_value(x).0.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let (log_y, slope) = self.log_value(x);
        Ok(log_y.exp() * slope)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_between_nodes() {
        let r: f64 = 0.04;
        let xs = vec![0.0, 1.0, 2.0];
        let ys = xs.iter().map(|t: &f64| (-r * t).exp()).collect();
        let interp = LogLinearInterpolator::new(xs, ys).unwrap();

        assert_relative_eq!(interp.interpolate(1.5).unwrap(), (-r * 1.5).exp(), epsilon = 1e-14);
        let fwd = -interp.derivative(0.7).unwrap() / interp.interpolate(0.7).unwrap();
        assert_relative_eq!(fwd, r, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
    }
}
