//! FX spot and outright forwards.
//!
//! On an FX curve the stored value is the outright rate itself, so both
//! instruments invert directly: the point at maturity is the quote.

use std::sync::Arc;
use tenor_core::types::Date;

use super::{InstrumentKind, PriceableInstrument};
use crate::error::CurveResult;
use crate::term_structure::TermStructure;

/// FX spot rate, used as the seed of an FX curve.
#[derive(Debug, Clone)]
pub struct FxSpot {
    id: String,
    date: Date,
    spot: f64,
}

impl FxSpot {
    /// Creates a spot quote settling on `date`.
    #[must_use]
    pub fn new(id: impl Into<String>, date: Date, spot: f64) -> Self {
        Self {
            id: id.into(),
            date,
            spot,
        }
    }
}

impl PriceableInstrument for FxSpot {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::FxSpot
    }

    fn risk_maturity_date(&self) -> Date {
        self.date
    }

    fn market_quote(&self) -> f64 {
        self.spot
    }

    fn with_market_quote(&self, quote: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Self {
            spot: quote,
            ..self.clone()
        })
    }

    fn implied_quote(&self, curve: &dyn TermStructure) -> CurveResult<f64> {
        curve.value_at(self.date)
    }

    fn value_at_maturity(&self, _curve: &dyn TermStructure) -> CurveResult<Option<f64>> {
        Ok(Some(self.spot))
    }
}

/// Outright FX forward.
#[derive(Debug, Clone)]
pub struct FxForward {
    id: String,
    maturity: Date,
    outright: f64,
}

impl FxForward {
    /// Creates an outright forward for delivery on `maturity`.
    #[must_use]
    pub fn new(id: impl Into<String>, maturity: Date, outright: f64) -> Self {
        Self {
            id: id.into(),
            maturity,
            outright,
        }
    }
}

impl PriceableInstrument for FxForward {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::FxForward
    }

    fn risk_maturity_date(&self) -> Date {
        self.maturity
    }

    fn market_quote(&self) -> f64 {
        self.outright
    }

    fn with_market_quote(&self, quote: f64) -> Arc<dyn PriceableInstrument> {
        Arc::new(Self {
            outright: quote,
            ..self.clone()
        })
    }

    fn implied_quote(&self, curve: &dyn TermStructure) -> CurveResult<f64> {
        curve.value_at(self.maturity)
    }

    fn value_at_maturity(&self, _curve: &dyn TermStructure) -> CurveResult<Option<f64>> {
        Ok(Some(self.outright))
    }
}
