//! Bilinear interpolation on a rectangular grid.

use crate::error::{MathError, MathResult};
use crate::interpolation::segment_index;

/// Bilinear interpolation over `z[i][j] = f(xs[i], ys[j])`.
///
/// With extrapolation enabled, queries outside the grid are clamped to the
/// nearest edge (flat extension along each axis); otherwise they fail.
#[derive(Debug, Clone)]
pub struct BilinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<Vec<f64>>,
    allow_extrapolation: bool,
}

impl BilinearInterpolator {
    /// Creates a grid interpolator. Each axis needs at least two strictly
    /// increasing nodes, and `zs` must be `xs.len()` rows of `ys.len()`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<Vec<f64>>) -> MathResult<Self> {
        for axis in [&xs, &ys] {
            if axis.len() < 2 {
                return Err(MathError::insufficient_data(2, axis.len()));
            }
            if axis.windows(2).any(|w| w[1] <= w[0]) {
                return Err(MathError::invalid_input(
                    "grid axes must be strictly increasing",
                ));
            }
        }
        if zs.len() != xs.len() || zs.iter().any(|row| row.len() != ys.len()) {
            return Err(MathError::invalid_input(format!(
                "grid values must be {}x{}",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self {
            xs,
            ys,
            zs,
            allow_extrapolation: false,
        })
    }

    /// Enables flat extension beyond the grid edges.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Row (first axis) nodes.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Column (second axis) nodes.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Interpolated value at `(x, y)`.
    pub fn interpolate(&self, x: f64, y: f64) -> MathResult<f64> {
        let x = self.clamp(&self.xs, x)?;
        let y = self.clamp(&self.ys, y)?;

        let i = segment_index(&self.xs, x);
        let j = segment_index(&self.ys, y);
        let u = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        let v = (y - self.ys[j]) / (self.ys[j + 1] - self.ys[j]);

        Ok((1.0 - u) * (1.0 - v) * self.zs[i][j]
            + u * (1.0 - v) * self.zs[i + 1][j]
            + (1.0 - u) * v * self.zs[i][j + 1]
            + u * v * self.zs[i + 1][j + 1])
    }

    fn clamp(&self, axis: &[f64], value: f64) -> MathResult<f64> {
        let (min, max) = (axis[0], axis[axis.len() - 1]);
        if value >= min && value <= max {
            Ok(value)
        } else if self.allow_extrapolation && !value.is_nan() {
            Ok(value.clamp(min, max))
        } else {
            Err(MathError::OutOfRange {
                x: value,
                min,
                max,
            })
        }
    }
}
