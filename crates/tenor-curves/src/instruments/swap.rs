//! Par swaps.

use std::sync::Arc;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::Date;

use super::{InstrumentKind, PriceableInstrument};
use crate::error::{CurveError, CurveResult};
use crate::term_structure::TermStructure;

/// A fixed-for-floating swap quoted by its par rate.
///
/// The floating leg is valued at par off the same curve, so
/// ```text
/// par = (DF(start) - DF(end)) / Σ τᵢ · DF(tᵢ)
/// ```
/// The maturity discount factor appears in the annuity too, so the point
/// is root-solved rather than inverted. Basis swaps use the same pricing
/// but are tagged [`InstrumentKind::BasisSwap`] so spread curves can drop
/// them.
#[derive(Debug, Clone)]
pub struct Swap {
    id: String,
    kind: InstrumentKind,
    start: Date,
    payment_dates: Vec<Date>,
    rate: f64,
    day_count: DayCountConvention,
}

impl Swap {
    /// Creates a swap paying fixed every `frequency_months` months from
    /// `start`, with a final (possibly short) period ending at `maturity`.
    pub fn new(
        id: impl Into<String>,
        start: Date,
        maturity: Date,
        rate: f64,
        frequency_months: i32,
    ) -> CurveResult<Self> {
        let id = id.into();
        if maturity <= start {
            return Err(CurveError::invalid_instrument(&id, "maturity must follow start"));
        }
        if frequency_months <= 0 {
            return Err(CurveError::invalid_instrument(&id, "frequency must be positive"));
        }

        let mut payment_dates = Vec::new();
        let mut k = 1;
        loop {
            let date = start.add_months(k * frequency_months)?;
            if date >= maturity {
                break;
            }
            payment_dates.push(date);
            k += 1;
        }
        payment_dates.push(maturity);

        Ok(Self {
            id,
            kind: InstrumentKind::Swap,
            start,
            payment_dates,
            rate,
            day_count: DayCountConvention::Act365Fixed,
        })
    }

    /// Tags the swap as a basis swap.
    #[must_use]
    pub fn as_basis_swap(mut self) -> Self {
        self.kind = InstrumentKind::BasisSwap;
        self
    }

    /// Sets the fixed-leg day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Fixed-leg payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    fn annuity(&self, curve: &dyn TermStructure) -> CurveResult<f64> {
        let mut previous = self.start;
        let mut annuity = 0.0;
        for date in &self.payment_dates {
            let tau = self.day_count.year_fraction(previous, *date);
            annuity += tau * curve.value_at(*date)?;
            previous = *date;
        }
        Ok(annuity)
    }
}

impl PriceableInstrument for Swap {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InstrumentKind {
        self.kind
    }

    fn risk_maturity_date(&self) -> Date {
        self.payment_dates[self.payment_dates.len() - 1]
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
        let annuity = self.annuity(curve)?;
        if annuity == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "annuity of {}",
                self.id
            )));
        }
        let df_start = curve.value_at(self.start)?;
        let df_end = curve.value_at(self.risk_maturity_date())?;
        Ok((df_start - df_end) / annuity)
    }
}
