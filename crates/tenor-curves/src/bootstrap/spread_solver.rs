//! Quote adjustments that reproduce a set of spreads over a discount curve.
//!
//! Rather than layering factors over the base, the base discount curve is
//! re-bootstrapped with its instrument quotes shifted by per-instrument
//! adjustments. Each quoted spread fixes the adjustments of one instrument
//! range so that the spread instrument's implied quote moves by exactly the
//! spread.

use std::cell::RefCell;
use std::sync::Arc;
use tenor_math::solvers::{solve, solve_from_guess, SolverConfig};
use tracing::{debug, info};

use super::sequential::calibration_error;
use crate::curve::{Curve, CurveKind};
use crate::error::{CurveError, CurveResult};
use crate::instruments::PriceableInstrument;

/// Days per year used to scale the initial bracket.
const DAYS_PER_YEAR: f64 = 365.0;

/// Solves quote adjustments for a discount curve range by range.
///
/// The instrument set is the base curve's instruments extended with every
/// spread instrument whose maturity is not already present, quoted at its
/// implied level on the base curve, and sorted by maturity.
#[derive(Debug)]
pub struct DiscountCurveSolver<'a> {
    base: &'a Curve,
    instruments: Vec<Arc<dyn PriceableInstrument>>,
    days: Vec<i64>,
    adjustments: Vec<f64>,
    zero_curve: Curve,
}

impl<'a> DiscountCurveSolver<'a> {
    /// Prepares the extended instrument set and the zero-adjustment curve.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `base` is not a discount curve,
    /// `DependencyNotReady` if it is not built.
    pub fn new(base: &'a Curve, spread_instruments: &[Arc<dyn PriceableInstrument>]) -> CurveResult<Self> {
        if !matches!(base.kind(), CurveKind::Discount) {
            return Err(CurveError::invalid_config(format!(
                "{} is not a discount curve",
                base.id()
            )));
        }
        if !base.is_ready() {
            return Err(CurveError::dependency_not_ready(base.id()));
        }

        let mut instruments: Vec<Arc<dyn PriceableInstrument>> = base.instruments().to_vec();
        for instrument in spread_instruments {
            let maturity = instrument.risk_maturity_date();
            if instruments.iter().any(|i| i.risk_maturity_date() == maturity) {
                continue;
            }
            let level = instrument.implied_quote(base)?;
            instruments.push(instrument.with_market_quote(level));
        }
        instruments.sort_by_key(|i| i.risk_maturity_date());

        let base_date = base.identifier().base_date;
        let days = instruments
            .iter()
            .map(|i| base_date.days_between(&i.risk_maturity_date()))
            .collect();
        let adjustments = vec![0.0; instruments.len()];

        let mut solver = Self {
            base,
            instruments,
            days,
            adjustments,
            zero_curve: base.clone(),
        };
        solver.zero_curve = solver.rebuild(&solver.adjustments, format!("{}.Zero", base.id()))?;
        Ok(solver)
    }

    /// Position of the instrument maturing on `instrument`'s maturity date.
    pub fn index_of(&self, instrument: &dyn PriceableInstrument) -> CurveResult<usize> {
        let maturity = instrument.risk_maturity_date();
        self.instruments
            .iter()
            .position(|i| i.risk_maturity_date() == maturity)
            .ok_or_else(|| {
                CurveError::invalid_instrument(
                    instrument.id(),
                    format!("no instrument of {} matures on {maturity}", self.base.id()),
                )
            })
    }

    /// Solves the adjustment that moves `instrument`'s implied quote by
    /// `spread`, applied over instruments `start..=end`.
    ///
    /// Instruments strictly inside the range take adjustments interpolated
    /// by days between the adjustment at `start - 1` and the solved one. A
    /// zero spread leaves the adjustments unchanged.
    pub fn solve_range(
        &mut self,
        instrument: &dyn PriceableInstrument,
        start: usize,
        end: usize,
        spread: f64,
    ) -> CurveResult<()> {
        if start > end || end >= self.instruments.len() {
            return Err(CurveError::invalid_instrument(
                instrument.id(),
                format!("range {start}..={end} outside {} instruments", self.instruments.len()),
            ));
        }
        if spread == 0.0 {
            return Ok(());
        }

        let unadjusted = instrument.implied_quote(&self.zero_curve)?;
        let years_out = self.days[start] as f64 / DAYS_PER_YEAR;
        let variance = 2.0 * (spread + years_out * spread);
        let sign = spread.signum();
        let (lower, upper) = {
            let a = spread - sign * variance;
            let b = spread + sign * variance;
            if a < b { (a, b) } else { (b, a) }
        };
        let config = SolverConfig::new(spread.abs() / 1000.0, self.base.config().max_iterations);

        let root = {
            let failure: RefCell<Option<CurveError>> = RefCell::new(None);
            let objective = |a: f64| {
                let adjustments = self.range_adjustments(start, end, a);
                let implied = self
                    .rebuild(&adjustments, format!("{}.Trial", self.base.id()))
                    .and_then(|curve| instrument.implied_quote(&curve));
                match implied {
                    Ok(quote) => quote - unadjusted - spread,
                    Err(e) => {
                        failure.borrow_mut().get_or_insert(e);
                        f64::NAN
                    }
                }
            };

            let mut result = solve(&objective, 0.0, lower, upper, &config);
            if failure.borrow().is_none() && matches!(&result, Err(e) if e.is_bracket_failure()) {
                debug!(instrument = instrument.id(), spread, "expanding spread bracket");
                result = solve_from_guess(&objective, 0.0, spread, spread, &config);
            }
            let cause = failure.borrow_mut().take();
            result.map_err(|e| calibration_error(instrument.id(), &e, cause))?.root
        };

        debug!(instrument = instrument.id(), start, end, spread, adjustment = root, "range solved");
        self.adjustments = self.range_adjustments(start, end, root);
        Ok(())
    }

    /// Adjustments after setting `end` to `a` and filling `start..end`.
    fn range_adjustments(&self, start: usize, end: usize, a: f64) -> Vec<f64> {
        let mut adjustments = self.adjustments.clone();
        let anchor = start
            .checked_sub(1)
            .filter(|&previous| self.days[previous] != self.days[end]);
        for i in start..end {
            adjustments[i] = match anchor {
                None => a,
                Some(previous) => {
                    let from = self.adjustments[previous];
                    let weight = (self.days[i] - self.days[previous]) as f64
                        / (self.days[end] - self.days[previous]) as f64;
                    from + (a - from) * weight
                }
            };
        }
        adjustments[end] = a;
        adjustments
    }

    fn rebuild(&self, adjustments: &[f64], id: String) -> CurveResult<Curve> {
        let instruments = self
            .instruments
            .iter()
            .zip(adjustments)
            .map(|(instrument, adjustment)| {
                if *adjustment == 0.0 {
                    Arc::clone(instrument)
                } else {
                    instrument.with_market_quote(instrument.market_quote() + adjustment)
                }
            })
            .collect();
        Curve::from_priceable_instruments(
            self.base.identifier().with_id(id),
            self.base.config().clone(),
            CurveKind::Discount,
            instruments,
        )
    }

    /// Solved adjustments, aligned with [`instruments`](Self::instruments).
    #[must_use]
    pub fn adjustments(&self) -> &[f64] {
        &self.adjustments
    }

    /// The extended instrument set in maturity order.
    #[must_use]
    pub fn instruments(&self) -> &[Arc<dyn PriceableInstrument>] {
        &self.instruments
    }

    /// The curve rebuilt with the current adjustments.
    pub fn adjusted_curve(&self, id: impl Into<String>) -> CurveResult<Curve> {
        self.rebuild(&self.adjustments, id.into())
    }
}

/// Rebuilds `base` so that each instrument in `spreads` reprices at its
/// base level plus its spread.
///
/// Spreads are solved in maturity order; each covers the instruments from
/// just after the previous spread instrument up to its own maturity.
///
/// # Errors
///
/// `InvalidInstrument` when two spread instruments mature on the same day.
pub fn create_adjusted_curve(
    base: &Curve,
    spreads: &[(Arc<dyn PriceableInstrument>, f64)],
    id: impl Into<String>,
) -> CurveResult<Curve> {
    let mut ordered: Vec<&(Arc<dyn PriceableInstrument>, f64)> = spreads.iter().collect();
    ordered.sort_by_key(|(instrument, _)| instrument.risk_maturity_date());
    for pair in ordered.windows(2) {
        if pair[0].0.risk_maturity_date() == pair[1].0.risk_maturity_date() {
            return Err(CurveError::invalid_instrument(
                pair[1].0.id(),
                format!("matures on the same day as {}", pair[0].0.id()),
            ));
        }
    }

    let spread_instruments: Vec<_> = ordered.iter().map(|(i, _)| Arc::clone(i)).collect();
    let mut solver = DiscountCurveSolver::new(base, &spread_instruments)?;

    let mut start = 0;
    for (instrument, spread) in ordered {
        let end = solver.index_of(instrument.as_ref())?;
        solver.solve_range(instrument.as_ref(), start, end, *spread)?;
        start = end + 1;
    }

    let id = id.into();
    info!(curve = %id, base = base.id(), spreads = spreads.len(), "adjusted curve solved");
    solver.adjusted_curve(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CurveConfig, CurveIdentifier, StructureType};
    use crate::instruments::{Deposit, StandardInstrumentFactory};
    use crate::quotes::InstrumentSet;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;
    use tenor_core::types::Date;

    fn base_curve() -> Curve {
        let base_date = Date::from_ymd(2024, 1, 1).unwrap();
        let set = InstrumentSet::new()
            .with_market_quote("USD-Deposit-1M", dec!(0.05))
            .with_market_quote("USD-Deposit-3M", dec!(0.051))
            .with_market_quote("USD-Deposit-1Y", dec!(0.0525));
        Curve::from_instruments(
            CurveIdentifier::new("USD-OIS", base_date, "LogLinear", StructureType::DiscountCurve, "USD"),
            CurveConfig::default(),
            CurveKind::Discount,
            &set,
            &StandardInstrumentFactory::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_spread_shifts_whole_range() {
        let base = base_curve();
        let one_year: Arc<dyn PriceableInstrument> = Arc::clone(&base.instruments()[2]);

        let mut solver = DiscountCurveSolver::new(&base, &[Arc::clone(&one_year)]).unwrap();
        assert_eq!(solver.instruments().len(), 3);
        solver.solve_range(one_year.as_ref(), 0, 2, 0.001).unwrap();

        for adjustment in solver.adjustments() {
            assert_relative_eq!(*adjustment, 0.001, epsilon = 1e-6);
        }
        let curve = solver.adjusted_curve("USD-OIS-ADJ").unwrap();
        assert_relative_eq!(one_year.implied_quote(&curve).unwrap(), 0.0535, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_spread_is_a_no_op() {
        let base = base_curve();
        let one_year = Arc::clone(&base.instruments()[2]);
        let mut solver = DiscountCurveSolver::new(&base, &[Arc::clone(&one_year)]).unwrap();
        solver.solve_range(one_year.as_ref(), 0, 2, 0.0).unwrap();
        assert!(solver.adjustments().iter().all(|a| *a == 0.0));
    }

    #[test]
    fn test_new_maturity_extends_instrument_set() {
        let base = base_curve();
        let base_date = base.identifier().base_date;
        let six_months: Arc<dyn PriceableInstrument> = Arc::new(Deposit::new(
            "USD-Deposit-6M",
            base_date,
            Date::from_ymd(2024, 7, 1).unwrap(),
            0.0,
        ));
        let solver = DiscountCurveSolver::new(&base, &[Arc::clone(&six_months)]).unwrap();
        assert_eq!(solver.instruments().len(), 4);
        assert_eq!(solver.index_of(six_months.as_ref()).unwrap(), 2);
        assert_relative_eq!(
            solver.instruments()[2].market_quote(),
            six_months.implied_quote(&base).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_same_day_spreads_rejected() {
        let base = base_curve();
        let one_year = Arc::clone(&base.instruments()[2]);
        let err = create_adjusted_curve(
            &base,
            &[(Arc::clone(&one_year), 0.001), (one_year, 0.002)],
            "USD-OIS-ADJ",
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::InvalidInstrument { .. }));
    }
}
