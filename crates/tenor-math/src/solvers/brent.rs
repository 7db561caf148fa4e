//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Combines bisection with secant steps and inverse quadratic interpolation,
/// falling back to bisection whenever the interpolated step is not
/// contracting the bracket fast enough. Derivative free.
///
/// Requires `f(a)` and `f(b)` to have opposite signs (or one of them to be
/// zero). Converges when `|f(x)| <= tolerance` or the bracket has shrunk
/// below the tolerance.
///
/// # Example
///
/// ```rust
/// use tenor_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(MathError::invalid_input(format!(
            "objective is not finite at bracket ends: f({a}) = {fa}, f({b}) = {fb}"
        )));
    }
    if fa * fb > 0.0 {
        return Err(MathError::InvalidBracket {
            lower: a,
            upper: b,
            g_lower: fa,
            g_upper: fb,
        });
    }

    // c is the contrapoint: f(b) and f(c) always straddle the root
    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let half = 0.5 * (c - b);

        if fb.abs() <= config.tolerance || half.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant step
                (2.0 * half * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let bound_interp = 3.0 * half * q - (tol * q).abs();
            let bound_prev = (e * q).abs();
            if 2.0 * p < bound_interp.min(bound_prev) {
                e = d;
                d = p / q;
            } else {
                d = half;
                e = d;
            }
        } else {
            d = half;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(half) };
        fb = f(b);

        if !fb.is_finite() {
            return Err(MathError::invalid_input(format!(
                "objective is not finite at x = {b}"
            )));
        }
    }

    log::debug!(
        "brent: no convergence after {} iterations, |f| = {:.3e}",
        config.max_iterations,
        fb.abs()
    );
    Err(MathError::convergence_failed(
        config.max_iterations,
        fb.abs(),
    ))
}
