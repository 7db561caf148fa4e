//! Money market deposit.

use std::sync::Arc;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::Date;

use super::{InstrumentKind, PriceableInstrument};
use crate::error::{CurveError, CurveResult};
use crate::term_structure::TermStructure;

/// A simple-interest deposit.
///
/// Repriced when:
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
/// so the maturity discount factor has a closed form.
#[derive(Debug, Clone)]
pub struct Deposit {
    id: String,
    start: Date,
    maturity: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit accruing ACT/360.
    #[must_use]
    pub fn new(id: impl Into<String>, start: Date, maturity: Date, rate: f64) -> Self {
        Self {
            id: id.into(),
            start,
            maturity,
            rate,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    fn accrual(&self) -> CurveResult<f64> {
        let tau = self.day_count.year_fraction(self.start, self.maturity);
        if tau == 0.0 {
            return Err(CurveError::zero_year_fraction(format!(
                "deposit {} starts on its maturity",
                self.id
            )));
        }
        Ok(tau)
    }
}

impl PriceableInstrument for Deposit {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Deposit
    }

    fn risk_maturity_date(&self) -> Date {
        self.maturity
    }

    fn market_quote(&self) -> f64 {
        self.rate
    }

    fn with_market_quote(&self, quote: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Self {
            rate: quote,
            ..self.clone()
        })
    }

    fn implied_quote(&self, curve: &dyn TermStructure) -> CurveResult<f64> {
        let tau = self.accrual()?;
        let df_start = curve.value_at(self.start)?;
        let df_end = curve.value_at(self.maturity)?;
        if df_end == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "discount factor at {} for {}",
                self.maturity, self.id
            )));
        }
        Ok((df_start / df_end - 1.0) / tau)
    }

    fn value_at_maturity(&self, curve: &dyn TermStructure) -> CurveResult<Option<f64>> {
        let tau = self.accrual()?;
        let df_start = curve.value_at(self.start)?;
        Ok(Some(df_start / (1.0 + self.rate * tau)))
    }
}
