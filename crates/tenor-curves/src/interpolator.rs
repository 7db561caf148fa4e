//! Curve interpolation over calibrated points.
//!
//! [`CurveInterpolator`] maps a [`TermCurve`] onto a time axis measured from
//! the base date, transforms values into the scheme's space (zero rates,
//! total variance, ...), and delegates to the `tenor-math` interpolators.
//! Queries past the calibrated range either fail or are extrapolated in the
//! same space, depending on the term curve's extrapolation flag.

use std::cmp::Ordering;
use std::fmt;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::{Compounding, Date};
use tenor_math::extrapolation::ExtrapolationMethod;
use tenor_math::interpolation::{
    CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator,
};

use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::term_curve::{ClosestValue, InterpolationMethod, Point, TermCurve};
use crate::term_structure::TermStructure;

enum Kernel {
    /// Single node: the curve is constant.
    Constant(f64),
    /// Interpolator in scheme space.
    Nodes(Box<dyn Interpolator>),
}

/// Interpolates a calibrated term curve on an ACT/365-style time axis.
pub struct CurveInterpolator {
    base_date: Date,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    compounding: Compounding,
    extrapolation_permitted: bool,
    extrapolation: ExtrapolationMethod,
    nodes: Vec<ClosestValue>,
    kernel: Kernel,
}

impl fmt::Debug for CurveInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveInterpolator")
            .field("base_date", &self.base_date)
            .field("method", &self.method)
            .field("extrapolation_permitted", &self.extrapolation_permitted)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl CurveInterpolator {
    /// Builds an interpolator for `term_curve` using the axis, compounding
    /// and extrapolation style from `config`.
    pub fn new(term_curve: &TermCurve, base_date: Date, config: &CurveConfig) -> CurveResult<Self> {
        let points = term_curve.points();
        if points.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }
        if points[0].date < base_date {
            return Err(CurveError::invalid_point(format!(
                "first point {} precedes base date {}",
                points[0].date, base_date
            )));
        }

        let nodes: Vec<ClosestValue> = points
            .iter()
            .map(|p| ClosestValue {
                date: p.date,
                time: config.day_count.year_fraction(base_date, p.date),
                value: p.value,
            })
            .collect();

        let mut interpolator = Self {
            base_date,
            day_count: config.day_count,
            method: term_curve.interpolation,
            compounding: config.compounding,
            extrapolation_permitted: term_curve.extrapolation_permitted,
            extrapolation: config.extrapolation,
            nodes,
            kernel: Kernel::Constant(points[0].value),
        };
        if interpolator.nodes.len() > 1 {
            interpolator.kernel = Kernel::Nodes(interpolator.build_kernel()?);
        }
        Ok(interpolator)
    }

    fn build_kernel(&self) -> CurveResult<Box<dyn Interpolator>> {
        let xs: Vec<f64> = self.nodes.iter().map(|n| n.time).collect();
        let ys = self.to_scheme_space()?;

        let kernel: Box<dyn Interpolator> = match self.method {
            InterpolationMethod::LogLinear => Box::new(LogLinearInterpolator::new(xs, ys)?),
            InterpolationMethod::CubicZero if xs.len() >= 3 => Box::new(CubicSpline::new(xs, ys)?),
            _ => Box::new(LinearInterpolator::new(xs, ys)?),
        };
        Ok(kernel)
    }

    fn to_scheme_space(&self) -> CurveResult<Vec<f64>> {
        match self.method {
            InterpolationMethod::Linear | InterpolationMethod::LogLinear => {
                Ok(self.nodes.iter().map(|n| n.value).collect())
            }
            InterpolationMethod::LinearZero | InterpolationMethod::CubicZero => {
                let mut rates = Vec::with_capacity(self.nodes.len());
                for (i, node) in self.nodes.iter().enumerate() {
                    if node.time == 0.0 {
                        if i > 0 {
                            return Err(CurveError::zero_year_fraction(format!(
                                "zero rate at {}",
                                node.date
                            )));
                        }
                        // Filled from the next node below
                        rates.push(f64::NAN);
                        continue;
                    }
                    if node.value <= 0.0 {
                        return Err(CurveError::invalid_point(format!(
                            "discount factor {} at {} must be positive",
                            node.value, node.date
                        )));
                    }
                    rates.push(self.compounding.zero_rate(node.value, node.time));
                }
                if rates[0].is_nan() {
                    rates[0] = rates[1];
                }
                Ok(rates)
            }
            InterpolationMethod::LinearVariance => Ok(self
                .nodes
                .iter()
                .map(|n| n.value * n.value * n.time)
                .collect()),
        }
    }

    fn from_scheme_space(&self, y: f64, t: f64) -> f64 {
        match self.method {
            InterpolationMethod::Linear | InterpolationMethod::LogLinear => y,
            InterpolationMethod::LinearZero | InterpolationMethod::CubicZero => {
                self.compounding.discount_factor(y, t)
            }
            InterpolationMethod::LinearVariance => {
                if t <= 0.0 {
                    self.nodes[0].value
                } else {
                    (y.max(0.0) / t).sqrt()
                }
            }
        }
    }

    fn extrapolate(&self, kernel: &dyn Interpolator, t: f64) -> CurveResult<f64> {
        let boundary = if t < kernel.min_x() {
            kernel.min_x()
        } else {
            kernel.max_x()
        };
        let y = kernel.interpolate(boundary)?;
        let slope = kernel.derivative(boundary)?;
        let extrapolator = self.extrapolation.extrapolator();

        let value = match (self.method, self.extrapolation) {
            (InterpolationMethod::LogLinear, _) => extrapolator
                .extrapolate(t, boundary, y.ln(), slope / y)
                .exp(),
            (InterpolationMethod::LinearVariance, ExtrapolationMethod::Flat) => {
                self.from_scheme_space(y, boundary)
            }
            _ => self.from_scheme_space(extrapolator.extrapolate(t, boundary, y, slope), t),
        };
        Ok(value)
    }

    fn out_of_range(&self, t: f64) -> CurveError {
        CurveError::ExtrapolationNotPermitted {
            coordinate: t,
            min: self.min_time(),
            max: self.max_time(),
        }
    }

    /// Value at a point on the curve.
    pub fn value(&self, point: &Point) -> CurveResult<f64> {
        self.value_at_time(self.point_time(point)?)
    }

    /// Time coordinate of a one-dimensional point.
    pub fn point_time(&self, point: &Point) -> CurveResult<f64> {
        match point {
            Point::Date(date) => Ok(self.time_of(*date)),
            Point::DatePair(start, end) => Ok(self.day_count.year_fraction(*start, *end)),
            Point::Time(t) => Ok(*t),
            Point::ExpiryStrike { .. } => Err(CurveError::invalid_point(
                "expiry/strike points need a volatility surface",
            )),
        }
    }

    /// The calibrated nodes bracketing `point`.
    ///
    /// Returns `None` when the point sits exactly on a node. Points outside
    /// the calibrated range have no bracketing pair and are an error.
    pub fn closest_values(&self, point: &Point) -> CurveResult<Option<(ClosestValue, ClosestValue)>> {
        let t = self.point_time(point)?;
        if t < self.min_time() || t > self.max_time() || t.is_nan() {
            return Err(self.out_of_range(t));
        }
        match self
            .nodes
            .binary_search_by(|n| n.time.partial_cmp(&t).unwrap_or(Ordering::Less))
        {
            Ok(_) => Ok(None),
            Err(i) => Ok(Some((self.nodes[i - 1], self.nodes[i]))),
        }
    }

    /// Calibrated nodes.
    #[must_use]
    pub fn nodes(&self) -> &[ClosestValue] {
        &self.nodes
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Day count of the time axis.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// First node time.
    #[must_use]
    pub fn min_time(&self) -> f64 {
        self.nodes[0].time
    }

    /// Last node time.
    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.nodes[self.nodes.len() - 1].time
    }
}

impl TermStructure for CurveInterpolator {
    fn base_date(&self) -> Date {
        self.base_date
    }

    fn time_of(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.base_date, date)
    }

    fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        match &self.kernel {
            Kernel::Constant(value) => {
                if !self.extrapolation_permitted && (t - self.min_time()).abs() > 0.0 {
                    return Err(self.out_of_range(t));
                }
                Ok(*value)
            }
            Kernel::Nodes(kernel) => {
                if kernel.in_range(t) {
                    Ok(self.from_scheme_space(kernel.interpolate(t)?, t))
                } else if self.extrapolation_permitted && !t.is_nan() {
                    self.extrapolate(kernel.as_ref(), t)
                } else {
                    Err(self.out_of_range(t))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_curve::CurvePoint;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn base() -> Date {
        d(2024, 1, 1)
    }

    fn discount_curve(method: InterpolationMethod, extrapolate: bool) -> TermCurve {
        TermCurve::new(
            vec![
                CurvePoint::new(base(), 1.0),
                CurvePoint::new(d(2024, 7, 1), 0.975),
                CurvePoint::new(d(2025, 1, 1), 0.95),
                CurvePoint::new(d(2026, 1, 1), 0.90),
            ],
            method,
            extrapolate,
        )
        .unwrap()
    }

    #[test]
    fn test_reproduces_nodes_for_every_scheme() {
        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::LinearZero,
            InterpolationMethod::CubicZero,
        ] {
            let curve = discount_curve(method, false);
            let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
            for p in curve.points() {
                assert_relative_eq!(interp.value_at(p.date).unwrap(), p.value, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_monotone_between_nodes() {
        let curve = discount_curve(InterpolationMethod::LogLinear, false);
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        let v = interp.value(&Point::Date(d(2024, 10, 1))).unwrap();
        assert!(v < 0.975 && v > 0.95);
    }

    #[test]
    fn test_extrapolation_forbidden() {
        let curve = discount_curve(InterpolationMethod::LinearZero, false);
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        let err = interp.value_at(d(2030, 1, 1)).unwrap_err();
        assert!(matches!(err, CurveError::ExtrapolationNotPermitted { .. }));
        // deterministic
        assert_eq!(interp.value_at(d(2030, 1, 1)).unwrap_err(), err);
    }

    #[test]
    fn test_flat_zero_extrapolation() {
        let curve = discount_curve(InterpolationMethod::LinearZero, true);
        let config = CurveConfig {
            extrapolation: ExtrapolationMethod::Flat,
            ..CurveConfig::default()
        };
        let interp = CurveInterpolator::new(&curve, base(), &config).unwrap();
        let last = interp.nodes()[3];
        let r = Compounding::Continuous.zero_rate(last.value, last.time);
        let t = last.time + 2.0;
        assert_relative_eq!(
            interp.value_at_time(t).unwrap(),
            (-r * t).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_log_linear_extrapolation_keeps_last_forward() {
        let curve = discount_curve(InterpolationMethod::LogLinear, true);
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        let t3 = interp.max_time();
        let t2 = interp.nodes()[2].time;
        let fwd = (0.95_f64 / 0.90).ln() / (t3 - t2);
        assert_relative_eq!(
            interp.value_at_time(t3 + 1.0).unwrap(),
            0.90 * (-fwd).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_closest_values() {
        let curve = discount_curve(InterpolationMethod::LogLinear, false);
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();

        assert_eq!(interp.closest_values(&Point::Date(d(2025, 1, 1))).unwrap(), None);

        let (prev, next) = interp
            .closest_values(&Point::Date(d(2025, 6, 1)))
            .unwrap()
            .unwrap();
        assert_eq!(prev.date, d(2025, 1, 1));
        assert_eq!(next.date, d(2026, 1, 1));

        assert!(interp.closest_values(&Point::Date(d(2027, 1, 1))).is_err());
    }

    #[test]
    fn test_rejects_points_before_base_date() {
        let curve = TermCurve::new(
            vec![
                CurvePoint::new(d(2023, 12, 31), 1.0),
                CurvePoint::new(d(2025, 1, 1), 0.95),
            ],
            InterpolationMethod::LinearZero,
            false,
        )
        .unwrap();
        assert!(CurveInterpolator::new(&curve, d(2023, 12, 31), &CurveConfig::default()).is_ok());

        let err = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap_err();
        assert!(matches!(err, CurveError::InvalidPoint { .. }));
    }

    #[test]
    fn test_linear_variance_flat_short_end() {
        let curve = TermCurve::new(
            vec![
                CurvePoint::new(base(), 0.20),
                CurvePoint::new(d(2025, 1, 1), 0.20),
                CurvePoint::new(d(2026, 1, 1), 0.25),
            ],
            InterpolationMethod::LinearVariance,
            false,
        )
        .unwrap();
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        assert_relative_eq!(interp.value_at(base()).unwrap(), 0.20);
        assert_relative_eq!(interp.value_at(d(2024, 6, 1)).unwrap(), 0.20, epsilon = 1e-12);

        let mid = interp.value_at(d(2025, 7, 1)).unwrap();
        assert!(mid > 0.20 && mid < 0.25);
    }

    #[test]
    fn test_point_kinds() {
        let curve = discount_curve(InterpolationMethod::Linear, false);
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        let by_pair = interp
            .value(&Point::DatePair(base(), d(2025, 1, 1)))
            .unwrap();
        assert_relative_eq!(by_pair, 0.95, epsilon = 1e-12);
        assert!(interp
            .value(&Point::ExpiryStrike {
                expiry: d(2025, 1, 1),
                strike: 100.0
            })
            .is_err());
    }

    #[test]
    fn test_single_point_curve_is_constant() {
        let curve =
            TermCurve::new(vec![CurvePoint::new(base(), 1.0)], InterpolationMethod::LogLinear, true)
                .unwrap();
        let interp = CurveInterpolator::new(&curve, base(), &CurveConfig::default()).unwrap();
        assert_relative_eq!(interp.value_at_time(3.0).unwrap(), 1.0);
    }
}
