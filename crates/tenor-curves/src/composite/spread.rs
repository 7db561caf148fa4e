//! Calibration targets for curves quoted as spreads over a base curve.

use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::instruments::PriceableInstrument;
use crate::term_structure::TermStructure;

/// Re-quotes each instrument at `implied_quote(base) + spread`.
///
/// The spread curve is then bootstrapped so that, combined with the base,
/// it reprices these targets.
pub fn spread_targets(
    base: &dyn TermStructure,
    instruments: &[Arc<dyn PriceableInstrument>],
    spreads: &[f64],
) -> CurveResult<Vec<Arc<dyn PriceableInstrument>>> {
    if instruments.len() != spreads.len() {
        return Err(CurveError::invalid_set(format!(
            "{} spread instruments but {} spreads",
            instruments.len(),
            spreads.len()
        )));
    }
    instruments
        .iter()
        .zip(spreads)
        .map(|(instrument, spread)| {
            let implied = instrument.implied_quote(base)?;
            Ok(instrument.with_market_quote(implied + spread))
        })
        .collect()
}
