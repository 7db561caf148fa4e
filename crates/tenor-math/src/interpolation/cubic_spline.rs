//! Natural cubic spline interpolation.

use crate::error::MathResult;
use crate::interpolation::{check_range, segment_index, validate_nodes, Interpolator};

/// Natural cubic spline (zero second derivative at both ends).
///
/// Second derivatives at the nodes are solved once at construction with the
/// tridiagonal (Thomas) algorithm.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Creates a natural cubic spline through at least three nodes.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 3)?;
        let y2s = second_derivatives(&xs, &ys);
        Ok(Self { xs, ys, y2s })
    }

    fn coefficients(&self, x: f64) -> (usize, f64, f64, f64) {
        let i = segment_index(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (i, h, a, b)
    }
}

fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2 = vec![0.0; n];
    let mut c_prime = vec![0.0; n];

    // Forward sweep over interior nodes 1..n-1
    for i in 1..n - 1 {
        let h_prev = xs[i] - xs[i - 1];
        let h_next = xs[i + 1] - xs[i];
        let diag = 2.0 * (h_prev + h_next);
        let rhs = 6.0 * ((ys[i + 1] - ys[i]) / h_next - (ys[i] - ys[i - 1]) / h_prev);

        let denom = diag - h_prev * c_prime[i - 1];
        c_prime[i] = h_next / denom;
        y2[i] = (rhs - h_prev * y2[i - 1]) / denom;
    }

    for i in (1..n - 1).rev() {
        y2[i] -= c_prime[i] * y2[i + 1];
    }
    y2
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let (i, h, a, b) = self.coefficients(x);
        Ok(a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.y2s[i] + (b.powi(3) - b) * self.y2s[i + 1]) * h * h / 6.0)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let (i, h, a, b) = self.coefficients(x);
        Ok((self.ys[i + 1] - self.ys[i]) / h
            - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[i + 1])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
