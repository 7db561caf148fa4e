//! Rate curves derived lazily from two curves.

use std::sync::Arc;
use tenor_core::types::Date;

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::term_curve::Point;
use crate::term_structure::TermStructure;

/// Ratio of two curves, `c1(p) / c2(p)`, evaluated on demand.
///
/// Typically built from two FX curves sharing a quote currency to get the
/// cross pair. Nothing is calibrated or stored.
#[derive(Debug, Clone)]
pub struct FxDerivedCurve {
    id: String,
    numerator: Arc<Curve>,
    denominator: Arc<Curve>,
}

impl FxDerivedCurve {
    /// Creates the derived curve.
    ///
    /// # Errors
    ///
    /// `DependencyNotReady` if either input is not built, `InvalidConfig`
    /// if their base dates differ.
    pub fn new(
        id: impl Into<String>,
        numerator: Arc<Curve>,
        denominator: Arc<Curve>,
    ) -> CurveResult<Self> {
        for curve in [&numerator, &denominator] {
            if !curve.is_ready() {
                return Err(CurveError::dependency_not_ready(curve.id()));
            }
        }
        if numerator.base_date() != denominator.base_date() {
            return Err(CurveError::invalid_config(format!(
                "{} and {} have different base dates",
                numerator.id(),
                denominator.id()
            )));
        }
        Ok(Self {
            id: id.into(),
            numerator,
            denominator,
        })
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value at a point.
    pub fn value(&self, point: &Point) -> CurveResult<f64> {
        let denominator = self.denominator.value(point)?;
        if denominator == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "{} at {point:?}",
                self.denominator.id()
            )));
        }
        Ok(self.numerator.value(point)? / denominator)
    }
}

impl TermStructure for FxDerivedCurve {
    fn base_date(&self) -> Date {
        self.numerator.base_date()
    }

    fn time_of(&self, date: Date) -> f64 {
        self.numerator.time_of(date)
    }

    fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        self.value(&Point::Time(t))
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        self.value(&Point::Date(date))
    }
}
