//! Calibrated curve points and query coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use tenor_core::types::Date;

use crate::error::{CurveError, CurveResult};

/// Interpolation scheme for a term curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Linear on the stored value
    Linear,
    /// Linear on the log of the stored value (discount factors)
    #[default]
    LogLinear,
    /// Linear on zero rates derived from discount factors
    LinearZero,
    /// Natural cubic spline on zero rates derived from discount factors
    CubicZero,
    /// Linear on total variance σ²t (volatilities)
    LinearVariance,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolationMethod::Linear => "Linear",
            InterpolationMethod::LogLinear => "LogLinear",
            InterpolationMethod::LinearZero => "LinearZero",
            InterpolationMethod::CubicZero => "CubicZero",
            InterpolationMethod::LinearVariance => "LinearVariance",
        };
        write!(f, "{name}")
    }
}

/// One calibrated (date, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Curve coordinate.
    pub date: Date,
    /// Discount factor, FX forward, volatility or spread factor.
    pub value: f64,
}

impl CurvePoint {
    /// Creates a point.
    #[must_use]
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// Output of calibration: ordered points plus how to read between them.
///
/// Points are strictly increasing by date; the first one sits on the
/// curve's base date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCurve {
    points: Vec<CurvePoint>,
    /// Interpolation scheme.
    pub interpolation: InterpolationMethod,
    /// Whether queries past the calibrated range are answered.
    pub extrapolation_permitted: bool,
}

impl TermCurve {
    /// Creates a term curve, checking that dates strictly increase.
    pub fn new(
        points: Vec<CurvePoint>,
        interpolation: InterpolationMethod,
        extrapolation_permitted: bool,
    ) -> CurveResult<Self> {
        ensure_strictly_increasing(&points)?;
        Ok(Self {
            points,
            interpolation,
            extrapolation_permitted,
        })
    }

    /// The calibrated points.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// True when nothing has been calibrated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First calibrated date.
    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.points.first().map(|p| p.date)
    }

    /// Last calibrated date.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.points.last().map(|p| p.date)
    }
}

/// Errors unless point dates strictly increase.
pub(crate) fn ensure_strictly_increasing(points: &[CurvePoint]) -> CurveResult<()> {
    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(CurveError::NonMonotonicPoints {
                index: index + 1,
                previous: pair[0].date.to_string(),
                current: pair[1].date.to_string(),
            });
        }
    }
    Ok(())
}

/// A coordinate at which a curve can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Point {
    /// A date, measured from the curve's base date.
    Date(Date),
    /// The year fraction between two dates.
    DatePair(Date, Date),
    /// A time offset in years.
    Time(f64),
    /// An (expiry, strike) pair on a surface.
    ExpiryStrike {
        /// Option expiry.
        expiry: Date,
        /// Strike level.
        strike: f64,
    },
}

impl From<Date> for Point {
    fn from(date: Date) -> Self {
        Point::Date(date)
    }
}

/// A calibrated node returned by a closest-values query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestValue {
    /// Node date.
    pub date: Date,
    /// Node time on the curve's axis.
    pub time: f64,
    /// Node value.
    pub value: f64,
}
