//! The queryable-curve abstraction shared by instruments and composites.

use tenor_core::types::Date;

use crate::error::CurveResult;

/// A function of time that instruments can be priced against.
///
/// Implemented by calibrated curves, by the trial curves the bootstrapper
/// builds while solving, and by lazily composed curves. The value is a
/// discount factor for rate curves, an outright forward for FX curves and a
/// volatility for volatility curves.
pub trait TermStructure: Send + Sync {
    /// Base date of the curve.
    fn base_date(&self) -> Date;

    /// Position of `date` on the curve's time axis, in years.
    fn time_of(&self, date: Date) -> f64;

    /// Curve value at a time offset.
    fn value_at_time(&self, t: f64) -> CurveResult<f64>;

    /// Curve value at a date.
    fn value_at(&self, date: Date) -> CurveResult<f64> {
        self.value_at_time(self.time_of(date))
    }
}
