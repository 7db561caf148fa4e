//! Sequential bootstrap.
//!
//! Solves for each instrument's curve point in maturity order, holding the
//! points already solved fixed.

use std::cell::RefCell;
use std::sync::Arc;
use tenor_core::types::Date;
use tenor_math::solvers::{solve, solve_from_guess, SolverConfig, SolverResult};
use tenor_math::MathError;
use tracing::{debug, warn};

use crate::config::{CurveConfig, DuplicatePointPolicy};
use crate::error::{CurveError, CurveResult};
use crate::instruments::PriceableInstrument;
use crate::interpolator::CurveInterpolator;
use crate::term_curve::{ensure_strictly_increasing, CurvePoint, TermCurve};
use crate::term_structure::TermStructure;

/// Relative half-width of the first bracket around the previous point.
const BRACKET_WIDTH: f64 = 0.5;

/// Step used to grow a bracket from a zero guess.
const ZERO_GUESS_STEP: f64 = 0.01;

/// Root-finder tolerance as a fraction of the repricing tolerance.
const SOLVER_TOLERANCE_RATIO: f64 = 0.1;

/// Inputs that stay fixed for one bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Curve base date; the seed point sits here.
    pub base_date: Date,
    /// Value of the seed point: 1.0 for discount factors and spread
    /// factors, spot for FX, the first quote for volatility.
    pub seed_value: f64,
    /// Interpolation, extrapolation, tolerance and duplicate handling.
    pub config: CurveConfig,
}

impl BootstrapSettings {
    /// Settings seeded with 1.0 at the base date.
    #[must_use]
    pub fn new(base_date: Date, config: &CurveConfig) -> Self {
        Self {
            base_date,
            seed_value: 1.0,
            config: config.clone(),
        }
    }

    /// Sets the seed value.
    #[must_use]
    pub fn with_seed_value(mut self, seed_value: f64) -> Self {
        self.seed_value = seed_value;
        self
    }
}

/// Sequential bootstrapper.
///
/// Works in two spaces. Plain curves solve the curve value directly. With an
/// overlay, each point is a factor and the trial curve the instruments see
/// is `overlay(t) × factor(t)`.
pub struct Bootstrapper<'a> {
    settings: BootstrapSettings,
    overlay: Option<&'a dyn TermStructure>,
    fixed_points: Vec<CurvePoint>,
}

impl<'a> Bootstrapper<'a> {
    /// Creates a bootstrapper.
    #[must_use]
    pub fn new(settings: BootstrapSettings) -> Self {
        Self {
            settings,
            overlay: None,
            fixed_points: Vec::new(),
        }
    }

    /// Solves factors over `base` instead of curve values.
    #[must_use]
    pub fn with_overlay(mut self, base: &'a dyn TermStructure) -> Self {
        self.overlay = Some(base);
        self
    }

    /// Points that are already known and are kept ahead of the strip.
    ///
    /// They must be in increasing date order and after the base date.
    #[must_use]
    pub fn with_fixed_points(mut self, points: Vec<CurvePoint>) -> Self {
        self.fixed_points = points;
        self
    }

    /// Bootstraps a term curve that reprices every instrument.
    ///
    /// Instruments are taken in maturity order. An instrument maturing on a
    /// point that already exists is skipped or re-solved depending on the
    /// configured [`DuplicatePointPolicy`].
    ///
    /// After the strip every instrument that owns a point is repriced on the
    /// full curve. Schemes where a later node moves earlier segments (the
    /// cubic spline) are re-stripped against the full curve until the worst
    /// error is within tolerance.
    ///
    /// # Errors
    ///
    /// - `InvalidInstrument` if an instrument matures on or before the base date
    /// - `NonMonotonicPoints` if the fixed points are out of order
    /// - `CalibrationFailure` if a point cannot be solved within tolerance, or
    ///   the curve still misprices an instrument after `max_iterations` passes
    pub fn bootstrap(&self, instruments: &[Arc<dyn PriceableInstrument>]) -> CurveResult<TermCurve> {
        let base_date = self.settings.base_date;
        let mut points = Vec::with_capacity(1 + self.fixed_points.len() + instruments.len());
        points.push(CurvePoint::new(base_date, self.settings.seed_value));
        points.extend_from_slice(&self.fixed_points);
        ensure_strictly_increasing(&points)?;

        let mut ordered: Vec<&Arc<dyn PriceableInstrument>> = instruments.iter().collect();
        ordered.sort_by_key(|instrument| instrument.risk_maturity_date());
        let mut owners: Vec<(Date, &dyn PriceableInstrument)> = Vec::with_capacity(ordered.len());

        for instrument in ordered {
            let maturity = instrument.risk_maturity_date();
            if maturity <= base_date {
                return Err(CurveError::invalid_instrument(
                    instrument.id(),
                    format!("matures on {maturity}, not after base date {base_date}"),
                ));
            }

            let position = points.partition_point(|p| p.date < maturity);
            if points.get(position).is_some_and(|p| p.date == maturity) {
                match self.settings.config.duplicate_policy {
                    DuplicatePointPolicy::Skip => {
                        warn!(instrument = instrument.id(), %maturity, "point already solved, skipping");
                        continue;
                    }
                    DuplicatePointPolicy::Replace => {
                        warn!(instrument = instrument.id(), %maturity, "point already solved, replacing");
                        points.remove(position);
                        owners.retain(|(date, _)| *date != maturity);
                    }
                }
            }

            let guess = points[position - 1].value;
            let value = self.solve_point(&points, position, guess, instrument.as_ref())?;
            debug!(instrument = instrument.id(), %maturity, value, "solved point");
            points.insert(position, CurvePoint::new(maturity, value));
            owners.push((maturity, instrument.as_ref()));
        }

        self.converge(&mut points, &owners)?;

        TermCurve::new(
            points,
            self.settings.config.interpolation,
            self.settings.config.extrapolation_permitted,
        )
    }

    /// Curve the instruments are priced against while solving.
    ///
    /// Always extrapolates: instruments routinely look past the last solved
    /// point.
    fn trial_curve(&self, points: Vec<CurvePoint>) -> CurveResult<TrialCurve<'a>> {
        let term_curve = TermCurve::new(points, self.settings.config.interpolation, true)?;
        let interpolator =
            CurveInterpolator::new(&term_curve, self.settings.base_date, &self.settings.config)?;
        Ok(TrialCurve {
            interpolator,
            overlay: self.overlay,
        })
    }

    fn to_point_space(&self, total: f64, date: Date) -> CurveResult<f64> {
        let Some(base) = self.overlay else {
            return Ok(total);
        };
        let base_value = base.value_at(date)?;
        if base_value == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "base curve value at {date}"
            )));
        }
        Ok(total / base_value)
    }

    /// Re-solves each owned point with every other point in place until all
    /// owners reprice within tolerance.
    fn converge(
        &self,
        points: &mut Vec<CurvePoint>,
        owners: &[(Date, &dyn PriceableInstrument)],
    ) -> CurveResult<()> {
        let tolerance = self.settings.config.tolerance;
        let max_passes = self.settings.config.max_iterations;
        let mut pass = 0;
        loop {
            let Some((worst, error)) = self.worst_repricing(points, owners)? else {
                return Ok(());
            };
            if error <= tolerance {
                if pass > 0 {
                    debug!(passes = pass, max_error = error, "strip converged");
                }
                return Ok(());
            }
            if pass >= max_passes {
                warn!(instrument = worst.id(), error, passes = pass, "strip did not converge");
                return Err(CurveError::calibration_failed(
                    worst.id(),
                    pass,
                    error,
                    format!("does not reprice within {tolerance:e} on the final curve"),
                ));
            }

            debug!(pass, instrument = worst.id(), error, "re-solving strip on full curve");
            for &(maturity, instrument) in owners {
                let position = points.partition_point(|p| p.date < maturity);
                let current = points.remove(position);
                let value = self.solve_point(points, position, current.value, instrument)?;
                points.insert(position, CurvePoint::new(maturity, value));
            }
            pass += 1;
        }
    }

    /// The owner with the largest repricing error on `points`, if any.
    fn worst_repricing<'b>(
        &self,
        points: &[CurvePoint],
        owners: &[(Date, &'b dyn PriceableInstrument)],
    ) -> CurveResult<Option<(&'b dyn PriceableInstrument, f64)>> {
        let curve = self.trial_curve(points.to_vec())?;
        let mut worst: Option<(&'b dyn PriceableInstrument, f64)> = None;
        for &(_, instrument) in owners {
            let implied = instrument.implied_quote(&curve)?;
            let error = (implied - instrument.market_quote()).abs();
            let error = if error.is_nan() { f64::INFINITY } else { error };
            match worst {
                Some((_, largest)) if largest >= error => {}
                _ => worst = Some((instrument, error)),
            }
        }
        Ok(worst)
    }

    fn solve_point(
        &self,
        points: &[CurvePoint],
        position: usize,
        guess: f64,
        instrument: &dyn PriceableInstrument,
    ) -> CurveResult<f64> {
        let maturity = instrument.risk_maturity_date();
        let target = instrument.market_quote();
        let tolerance = self.settings.config.tolerance;

        let implied_with = |value: f64| -> CurveResult<f64> {
            let mut trial = points.to_vec();
            trial.insert(position, CurvePoint::new(maturity, value));
            instrument.implied_quote(&self.trial_curve(trial)?)
        };

        let current = self.trial_curve(points.to_vec())?;
        if let Some(total) = instrument.value_at_maturity(&current)? {
            let value = self.to_point_space(total, maturity)?;
            if value.is_finite() {
                match implied_with(value) {
                    Ok(quote) if (quote - target).abs() <= tolerance => return Ok(value),
                    Ok(quote) => debug!(
                        instrument = instrument.id(),
                        residual = quote - target,
                        "closed form off target, root solving"
                    ),
                    Err(e) => debug!(instrument = instrument.id(), error = %e, "closed form failed"),
                }
            }
        }

        let solver = SolverConfig::new(
            tolerance * SOLVER_TOLERANCE_RATIO,
            self.settings.config.max_iterations,
        );
        let failure: RefCell<Option<CurveError>> = RefCell::new(None);
        let objective = |value: f64| match implied_with(value) {
            Ok(quote) => quote,
            Err(e) => {
                failure.borrow_mut().get_or_insert(e);
                f64::NAN
            }
        };

        let (lower, upper) = initial_bracket(guess);
        let mut result = if lower < upper {
            solve(&objective, target, lower, upper, &solver)
        } else {
            Err(MathError::invalid_input("degenerate initial bracket"))
        };
        if failure.borrow().is_none()
            && matches!(
                result,
                Err(MathError::InvalidBracket { .. } | MathError::InvalidInput { .. })
            )
        {
            let step = if guess == 0.0 {
                ZERO_GUESS_STEP
            } else {
                BRACKET_WIDTH * guess.abs()
            };
            debug!(instrument = instrument.id(), guess, step, "expanding bracket");
            result = solve_from_guess(&objective, target, guess, step, &solver);
        }

        let cause = failure.borrow_mut().take();
        let SolverResult {
            root,
            iterations,
            residual,
        } = result.map_err(|e| calibration_error(instrument.id(), &e, cause))?;

        if !root.is_finite() {
            return Err(CurveError::calibration_failed(
                instrument.id(),
                iterations,
                residual,
                "solution is not finite",
            ));
        }
        if residual.is_nan() || residual.abs() > tolerance {
            return Err(CurveError::calibration_failed(
                instrument.id(),
                iterations,
                residual,
                format!("root misprices by {residual:e}, tolerance {tolerance:e}"),
            ));
        }
        Ok(root)
    }
}

fn initial_bracket(guess: f64) -> (f64, f64) {
    let a = guess * (1.0 - BRACKET_WIDTH);
    let b = guess * (1.0 + BRACKET_WIDTH);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub(super) fn calibration_error(instrument: &str, error: &MathError, cause: Option<CurveError>) -> CurveError {
    let (iterations, residual) = match error {
        MathError::ConvergenceFailed {
            iterations,
            residual,
        } => (*iterations, *residual),
        _ => (0, f64::NAN),
    };
    let message = cause.map_or_else(|| error.to_string(), |c| c.to_string());
    CurveError::calibration_failed(instrument, iterations, residual, message)
}

/// Interpolated points, optionally scaled by an overlay curve.
struct TrialCurve<'a> {
    interpolator: CurveInterpolator,
    overlay: Option<&'a dyn TermStructure>,
}

impl TermStructure for TrialCurve<'_> {
    fn base_date(&self) -> Date {
        self.interpolator.base_date()
    }

    fn time_of(&self, date: Date) -> f64 {
        self.interpolator.time_of(date)
    }

    fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        let own = self.interpolator.value_at_time(t)?;
        match self.overlay {
            Some(base) => Ok(base.value_at_time(t)? * own),
            None => Ok(own),
        }
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        let own = self.interpolator.value_at(date)?;
        match self.overlay {
            Some(base) => Ok(base.value_at(date)? * own),
            None => Ok(own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Deposit, Swap};
    use crate::term_curve::InterpolationMethod;
    use approx::assert_relative_eq;
    use tenor_core::daycounts::DayCountConvention;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn base() -> Date {
        d(2024, 1, 1)
    }

    fn deposit(id: &str, maturity: Date, rate: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Deposit::new(id, base(), maturity, rate))
    }

    fn swap(id: &str, years: i32, rate: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Swap::new(id, base(), base().add_years(years).unwrap(), rate, 12).unwrap())
    }

    fn settings(config: &CurveConfig) -> BootstrapSettings {
        BootstrapSettings::new(base(), config)
    }

    #[test]
    fn test_deposits_invert_directly() {
        let config = CurveConfig::default();
        let instruments = vec![
            deposit("USD-Deposit-3M", d(2024, 4, 1), 0.051),
            deposit("USD-Deposit-1M", d(2024, 2, 1), 0.05),
        ];
        let curve = Bootstrapper::new(settings(&config))
            .bootstrap(&instruments)
            .unwrap();

        let points = curve.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], CurvePoint::new(base(), 1.0));
        assert_eq!(points[1].date, d(2024, 2, 1));
        assert_relative_eq!(
            points[2].value,
            1.0 / (1.0 + 0.051 * 91.0 / 360.0),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_swaps_are_root_solved_and_reprice() {
        let config = CurveConfig::default().with_interpolation(InterpolationMethod::LinearZero);
        let instruments = vec![
            deposit("USD-Deposit-6M", d(2024, 7, 1), 0.05),
            swap("USD-Swap-2Y", 2, 0.046),
            swap("USD-Swap-5Y", 5, 0.042),
            swap("USD-Swap-10Y", 10, 0.041),
        ];
        let term_curve = Bootstrapper::new(settings(&config))
            .bootstrap(&instruments)
            .unwrap();
        let interpolator = CurveInterpolator::new(&term_curve, base(), &config).unwrap();

        for instrument in &instruments {
            let implied = instrument.implied_quote(&interpolator).unwrap();
            assert_relative_eq!(implied, instrument.market_quote(), epsilon = config.tolerance);
        }
        let values: Vec<f64> = term_curve.points().iter().map(|p| p.value).collect();
        assert!(values.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_spline_strip_is_resolved_on_full_curve() {
        let config = CurveConfig::default().with_interpolation(InterpolationMethod::CubicZero);
        let instruments = vec![
            deposit("USD-Deposit-1M", d(2024, 2, 1), 0.05),
            deposit("USD-Deposit-3M", d(2024, 4, 1), 0.051),
            deposit("USD-Deposit-1Y", d(2025, 1, 1), 0.0525),
            swap("USD-Swap-2Y", 2, 0.05),
            swap("USD-Swap-5Y", 5, 0.048),
            swap("USD-Swap-10Y", 10, 0.045),
        ];
        let term_curve = Bootstrapper::new(settings(&config))
            .bootstrap(&instruments)
            .unwrap();
        let interpolator = CurveInterpolator::new(&term_curve, base(), &config).unwrap();

        for instrument in &instruments {
            let implied = instrument.implied_quote(&interpolator).unwrap();
            assert!(
                (implied - instrument.market_quote()).abs() <= config.tolerance,
                "{} misprices by {:e}",
                instrument.id(),
                implied - instrument.market_quote()
            );
        }
    }

    #[test]
    fn test_root_outside_tolerance_is_rejected() {
        // Par rates are quantised far more coarsely than this near the root
        let config = CurveConfig::default().with_tolerance(1e-300);
        let instruments = vec![
            swap("USD-Swap-2Y", 2, 0.046),
            swap("USD-Swap-3Y", 3, 0.043),
            swap("USD-Swap-7Y", 7, 0.041),
        ];
        let err = Bootstrapper::new(settings(&config))
            .bootstrap(&instruments)
            .unwrap_err();
        match err {
            CurveError::CalibrationFailure { instrument, .. } => {
                assert!(instrument.starts_with("USD-Swap-"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_maturity_policies() {
        let instruments: Vec<Arc<dyn PriceableInstrument>> = vec![
            deposit("A", d(2024, 4, 1), 0.05),
            Arc::new(
                Deposit::new("B", base(), d(2024, 4, 1), 0.06)
                    .with_day_count(DayCountConvention::Act365Fixed),
            ),
        ];

        let skip = CurveConfig {
            duplicate_policy: DuplicatePointPolicy::Skip,
            ..CurveConfig::default()
        };
        let skipped = Bootstrapper::new(settings(&skip))
            .bootstrap(&instruments)
            .unwrap();
        assert_eq!(skipped.points().len(), 2);
        assert_relative_eq!(
            skipped.points()[1].value,
            1.0 / (1.0 + 0.05 * 91.0 / 360.0),
            epsilon = 1e-14
        );

        let replaced = Bootstrapper::new(settings(&CurveConfig::default()))
            .bootstrap(&instruments)
            .unwrap();
        assert_eq!(replaced.points().len(), 2);
        assert_relative_eq!(
            replaced.points()[1].value,
            1.0 / (1.0 + 0.06 * 91.0 / 365.0),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_rejects_instrument_at_base_date() {
        let instruments = vec![deposit("USD-Deposit-0D", base(), 0.05)];
        let err = Bootstrapper::new(settings(&CurveConfig::default()))
            .bootstrap(&instruments)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_unsolvable_point_names_instrument() {
        // A par rate this negative needs a discount factor far above any bracket
        let config = CurveConfig::default();
        let instruments = vec![swap("USD-Swap-3Y", 3, -5.0)];
        let err = Bootstrapper::new(settings(&config))
            .bootstrap(&instruments)
            .unwrap_err();
        match err {
            CurveError::CalibrationFailure { instrument, .. } => assert_eq!(instrument, "USD-Swap-3Y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overlay_solves_factors() {
        let flat = TermCurve::new(
            vec![
                CurvePoint::new(base(), 1.0),
                CurvePoint::new(d(2034, 1, 1), (-0.04_f64 * 3653.0 / 365.0).exp()),
            ],
            InterpolationMethod::LogLinear,
            true,
        )
        .unwrap();
        let config = CurveConfig::default();
        let flat = CurveInterpolator::new(&flat, base(), &config).unwrap();

        let spread_config = config.clone().with_interpolation(InterpolationMethod::Linear);
        let instruments = vec![deposit("USD-Deposit-1Y", d(2025, 1, 1), 0.05)];
        let factors = Bootstrapper::new(settings(&spread_config))
            .with_overlay(&flat)
            .bootstrap(&instruments)
            .unwrap();

        let df_total = 1.0 / (1.0 + 0.05 * 366.0 / 360.0);
        let df_base = flat.value_at(d(2025, 1, 1)).unwrap();
        assert_relative_eq!(factors.points()[1].value, df_total / df_base, epsilon = 1e-13);
    }

    #[test]
    fn test_fixed_points_precede_strip() {
        let config = CurveConfig::default();
        let fixed = vec![CurvePoint::new(d(2024, 7, 1), 0.975)];
        let instruments = vec![swap("USD-Swap-2Y", 2, 0.045)];
        let curve = Bootstrapper::new(settings(&config))
            .with_fixed_points(fixed)
            .bootstrap(&instruments)
            .unwrap();
        assert_eq!(curve.points().len(), 3);
        assert_relative_eq!(curve.points()[1].value, 0.975);

        let unordered = vec![CurvePoint::new(base(), 0.99)];
        let err = Bootstrapper::new(settings(&config))
            .with_fixed_points(unordered)
            .bootstrap(&instruments)
            .unwrap_err();
        assert!(matches!(err, CurveError::NonMonotonicPoints { .. }));
    }
}
