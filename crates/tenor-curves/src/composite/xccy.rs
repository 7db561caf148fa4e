//! Cross-currency spread curve construction.
//!
//! The curve is assembled from two point sources split at the cut-over
//! date:
//!
//! - **Short end** (`date <= cut_over`): discount factors implied by FX
//!   forwards and the currency-2 curve through covered interest parity,
//!   taken at the FX curve's own pillar dates.
//! - **Long end** (`date > cut_over`): quoted cross-currency spread
//!   instruments, bootstrapped on top of the short end.

use std::sync::Arc;
use tenor_core::types::Date;

use crate::config::QuoteBasis;
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::PriceableInstrument;
use crate::term_curve::CurvePoint;
use crate::term_structure::TermStructure;

/// Partition predicate shared by both point sources.
#[must_use]
pub fn is_short_end(date: Date, cut_over_date: Date) -> bool {
    date <= cut_over_date
}

/// Currency-1 discount factor implied by covered interest parity.
///
/// ```text
/// Currency2PerCurrency1:  DF1 = F / S · DF2
/// Currency1PerCurrency2:  DF1 = S / F · DF2
/// ```
pub fn synthetic_discount_factor(
    spot: f64,
    forward: f64,
    df2: f64,
    basis: QuoteBasis,
) -> CurveResult<f64> {
    match basis {
        QuoteBasis::Currency2PerCurrency1 => {
            if spot == 0.0 {
                return Err(CurveError::division_by_zero("FX spot"));
            }
            Ok(forward / spot * df2)
        }
        QuoteBasis::Currency1PerCurrency2 => {
            if forward == 0.0 {
                return Err(CurveError::division_by_zero("FX forward"));
            }
            Ok(spot / forward * df2)
        }
    }
}

/// Currency-1 discount factors generated from an FX curve and the
/// currency-2 curve, at every FX pillar up to `up_to`.
///
/// The first point is the base date at 1.0.
pub fn generate_rate_curve(
    fx: &Curve,
    currency2: &Curve,
    basis: QuoteBasis,
    up_to: Date,
) -> CurveResult<Vec<CurvePoint>> {
    let base_date = fx.base_date();
    let fx_points = fx.term_curve()?.points();
    let spot = fx_points
        .first()
        .map(|p| p.value)
        .ok_or_else(|| CurveError::CurveNotReady {
            curve: fx.id().to_string(),
        })?;

    let mut points = vec![CurvePoint::new(base_date, 1.0)];
    for pillar in fx_points
        .iter()
        .filter(|p| p.date > base_date && is_short_end(p.date, up_to))
    {
        let df2 = currency2.value_at(pillar.date)?;
        let df1 = synthetic_discount_factor(spot, pillar.value, df2, basis)?;
        points.push(CurvePoint::new(pillar.date, df1));
    }
    Ok(points)
}

/// Short-end points expressed as factors over the currency-1 base curve.
pub(crate) fn short_end_factors(
    base: &Curve,
    fx: &Curve,
    currency2: &Curve,
    basis: QuoteBasis,
    cut_over_date: Date,
) -> CurveResult<Vec<CurvePoint>> {
    generate_rate_curve(fx, currency2, basis, cut_over_date)?
        .into_iter()
        .skip(1)
        .map(|point| {
            let base_value = base.value_at(point.date)?;
            if base_value == 0.0 {
                return Err(CurveError::division_by_zero(format!(
                    "base discount factor at {}",
                    point.date
                )));
            }
            Ok(CurvePoint::new(point.date, point.value / base_value))
        })
        .collect()
}

/// Quoted instruments and their spreads beyond the cut-over date.
pub(crate) fn long_end(
    instruments: &[Arc<dyn PriceableInstrument>],
    spreads: &[f64],
    cut_over_date: Date,
) -> (Vec<Arc<dyn PriceableInstrument>>, Vec<f64>) {
    instruments
        .iter()
        .zip(spreads)
        .filter(|(instrument, _)| !is_short_end(instrument.risk_maturity_date(), cut_over_date))
        .map(|(instrument, spread)| (Arc::clone(instrument), *spread))
        .unzip()
}
