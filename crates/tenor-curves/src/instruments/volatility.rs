//! Volatility quotes.

use std::sync::Arc;
use tenor_core::types::Date;

use super::{InstrumentKind, PriceableInstrument};
use crate::error::CurveResult;
use crate::term_structure::TermStructure;

/// An implied volatility for a single expiry.
///
/// A volatility curve stores the quote as is, so the point is the quote.
#[derive(Debug, Clone)]
pub struct VolatilityQuote {
    id: String,
    expiry: Date,
    vol: f64,
}

impl VolatilityQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(id: impl Into<String>, expiry: Date, vol: f64) -> Self {
        Self {
            id: id.into(),
            expiry,
            vol,
        }
    }
}

impl PriceableInstrument for VolatilityQuote {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Volatility
    }

    fn risk_maturity_date(&self) -> Date {
        self.expiry
    }

    fn market_quote(&self) -> f64 {
        self.vol
    }

    fn with_market_quote(&self, quote: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Self {
            vol: quote,
            ..self.clone()
        })
    }

    fn implied_quote(&self, curve: &dyn TermStructure) -> CurveResult<f64> {
        curve.value_at(self.expiry)
    }

    fn value_at_maturity(&self, _curve: &dyn TermStructure) -> CurveResult<Option<f64>> {
        Ok(Some(self.vol))
    }
}
