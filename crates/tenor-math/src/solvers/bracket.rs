//! Target solving on a checked bracket, and bracket expansion.

use crate::error::{MathError, MathResult};
use crate::solvers::{brent, SolverConfig, SolverResult};

/// Upper bound on objective evaluations while expanding a bracket.
pub const MAX_FUNCTION_EVALUATIONS: u32 = 100;

/// Growth factor applied to the bracket on each expansion step.
pub const GOLDEN_GROWTH: f64 = 1.618;

/// Finds `x` in `[lower, upper]` with `f(x) = target`.
///
/// The bracket must satisfy `lower < upper`. If either end already meets the
/// target within tolerance it is returned without iterating. Otherwise the
/// ends must straddle the target, and Brent's method finishes the job.
pub fn solve<F>(
    f: F,
    target: f64,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    if lower.partial_cmp(&upper) != Some(std::cmp::Ordering::Less) {
        return Err(MathError::invalid_input(format!(
            "lower bound {lower} must be below upper bound {upper}"
        )));
    }

    let g = |x: f64| f(x) - target;
    let g_lower = g(lower);
    if g_lower.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lower,
            iterations: 0,
            residual: g_lower,
        });
    }
    let g_upper = g(upper);
    if g_upper.abs() < config.tolerance {
        return Ok(SolverResult {
            root: upper,
            iterations: 0,
            residual: g_upper,
        });
    }
    if g_lower * g_upper > 0.0 {
        return Err(MathError::InvalidBracket {
            lower,
            upper,
            g_lower,
            g_upper,
        });
    }

    brent(g, lower, upper, config)
}

/// Finds `x` with `f(x) = target`, starting from `guess`.
///
/// The initial bracket is `[guess, guess + step]`. While it does not
/// straddle the target, the end with the smaller residual is pushed away
/// from the other by [`GOLDEN_GROWTH`] times the bracket width. Fails with
/// `ConvergenceFailed` after [`MAX_FUNCTION_EVALUATIONS`] evaluations.
pub fn solve_from_guess<F>(
    f: F,
    target: f64,
    guess: f64,
    step: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    if step == 0.0 || !step.is_finite() {
        return Err(MathError::invalid_input("bracket step must be non-zero"));
    }

    let g = |x: f64| f(x) - target;
    let mut a = guess;
    let mut b = guess + step;
    let mut ga = g(a);
    let mut gb = g(b);
    let mut evaluations = 2;

    while ga * gb > 0.0 {
        if evaluations >= MAX_FUNCTION_EVALUATIONS {
            return Err(MathError::convergence_failed(
                evaluations,
                ga.abs().min(gb.abs()),
            ));
        }
        if ga.abs() < gb.abs() {
            a += GOLDEN_GROWTH * (a - b);
            ga = g(a);
        } else {
            b += GOLDEN_GROWTH * (b - a);
            gb = g(b);
        }
        evaluations += 1;
        if !ga.is_finite() || !gb.is_finite() {
            return Err(MathError::invalid_input(
                "objective became non-finite during bracket expansion",
            ));
        }
    }

    let (lower, upper) = if a < b { (a, b) } else { (b, a) };
    log::trace!("bracket [{lower}, {upper}] found after {evaluations} evaluations");
    solve(f, target, lower, upper, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_target() {
        let f = |x: f64| x * x;

        let result = solve(f, 2.0, 0.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_rejects_inverted_bracket() {
        let result = solve(|x| x, 0.5, 1.0, 0.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_solve_returns_endpoint_without_iterating() {
        let result = solve(|x| 2.0 * x, 4.0, 2.0, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.iterations, 0);
        assert_relative_eq!(result.root, 2.0);
    }

    #[test]
    fn test_solve_same_sign_is_invalid_bracket() {
        let result = solve(|x| x * x, -1.0, 1.0, 2.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_expansion_finds_distant_root() {
        let f = |x: f64| x - 37.5;

        let result = solve_from_guess(f, 0.0, 0.0, 0.1, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 37.5, epsilon = 1e-9);
    }

    #[test]
    fn test_expansion_walks_downward() {
        let f = |x: f64| x.exp();

        let result = solve_from_guess(f, 0.01, 1.0, 0.5, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 0.01_f64.ln(), epsilon = 1e-7);
    }

    #[test]
    fn test_expansion_gives_up() {
        let f = |x: f64| x * x + 1.0;

        let result = solve_from_guess(f, 0.0, 0.0, 1.0, &SolverConfig::default());

        assert!(result.is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_solve_inverts_monotone_function(target in -5.0f64..5.0) {
            let f = |x: f64| x * x * x + x;
            let result = solve(f, target, -10.0, 10.0, &SolverConfig::new(1e-12, 200)).unwrap();
            proptest::prop_assert!((f(result.root) - target).abs() < 1e-9);
        }
    }
}
