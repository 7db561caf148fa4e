//! Market quotes and instrument sets.
//!
//! An [`InstrumentSet`] pairs instrument records with their quotes,
//! position by position. Quotes stay in `Decimal` until a curve selects the
//! measure it calibrates to, at which point they become `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tenor_core::daycounts::DayCountConvention;

use crate::error::{CurveError, CurveResult};

/// What a quote measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureType {
    /// Rate, price or level as quoted in the market
    MarketQuote,
    /// Spread over a base curve
    Spread,
    /// Discount factor
    DiscountFactor,
    /// Implied volatility
    Volatility,
    /// FX forward points
    ForwardPoints,
}

/// A single quoted value.
///
/// `value` is `None` when the quote is structurally present but unpriced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// The measure.
    pub measure: MeasureType,
    /// The quoted value.
    pub value: Option<Decimal>,
    /// Additive adjustment applied on top of the value.
    #[serde(default)]
    pub adjustment: Option<Decimal>,
}

impl Quote {
    /// Creates a quote with a value.
    #[must_use]
    pub fn new(measure: MeasureType, value: Decimal) -> Self {
        Self {
            measure,
            value: Some(value),
            adjustment: None,
        }
    }

    /// Creates a market quote.
    #[must_use]
    pub fn market(value: Decimal) -> Self {
        Self::new(MeasureType::MarketQuote, value)
    }

    /// Creates a spread quote.
    #[must_use]
    pub fn spread(value: Decimal) -> Self {
        Self::new(MeasureType::Spread, value)
    }

    /// Sets the adjustment.
    #[must_use]
    pub fn with_adjustment(mut self, adjustment: Decimal) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    /// Value plus adjustment, if a value is present.
    #[must_use]
    pub fn effective_value(&self) -> Option<Decimal> {
        self.value
            .map(|v| v + self.adjustment.unwrap_or(Decimal::ZERO))
    }
}

/// All quotes for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Quotes for the instrument.
    pub quotes: Vec<Quote>,
}

impl AssetQuote {
    /// Creates an asset quote.
    #[must_use]
    pub fn new(instrument_id: impl Into<String>, quotes: Vec<Quote>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            quotes,
        }
    }

    /// Returns the single quote of the requested measure.
    ///
    /// Zero matches, more than one match, or a match without a value is
    /// invalid input.
    pub fn select(&self, measure: MeasureType) -> CurveResult<&Quote> {
        let mut matches = self.quotes.iter().filter(|q| q.measure == measure);
        let quote = matches.next().ok_or_else(|| {
            CurveError::invalid_instrument(
                &self.instrument_id,
                format!("no {measure:?} quote"),
            )
        })?;
        if matches.next().is_some() {
            return Err(CurveError::invalid_instrument(
                &self.instrument_id,
                format!("more than one {measure:?} quote"),
            ));
        }
        if quote.value.is_none() {
            return Err(CurveError::invalid_instrument(
                &self.instrument_id,
                format!("{measure:?} quote has no value"),
            ));
        }
        Ok(quote)
    }

    /// Selected quote as `f64`, adjustment included.
    pub fn select_value(&self, measure: MeasureType) -> CurveResult<f64> {
        let quote = self.select(measure)?;
        quote
            .effective_value()
            .and_then(|v| v.to_f64())
            .ok_or_else(|| {
                CurveError::invalid_instrument(&self.instrument_id, "quote not representable")
            })
    }

    /// Folds any spread into the market quote and zeroes the spread.
    ///
    /// Quotes without both a market quote and a spread are returned as is.
    #[must_use]
    pub fn normalised(&self) -> Self {
        let spread = self
            .quotes
            .iter()
            .find(|q| q.measure == MeasureType::Spread)
            .and_then(Quote::effective_value);
        let has_market = self
            .quotes
            .iter()
            .any(|q| q.measure == MeasureType::MarketQuote && q.value.is_some());

        let Some(spread) = spread.filter(|_| has_market) else {
            return self.clone();
        };

        let quotes = self
            .quotes
            .iter()
            .map(|q| match q.measure {
                MeasureType::MarketQuote => Quote {
                    value: q.value.map(|v| v + spread),
                    ..q.clone()
                },
                MeasureType::Spread => Quote {
                    value: Some(Decimal::ZERO),
                    adjustment: None,
                    ..q.clone()
                },
                _ => q.clone(),
            })
            .collect();
        Self {
            instrument_id: self.instrument_id.clone(),
            quotes,
        }
    }
}

/// Static description of an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Identifier, e.g. `USD-Deposit-3M`.
    pub id: String,
    /// Accrual day count; instrument default when absent.
    #[serde(default)]
    pub day_count: Option<DayCountConvention>,
}

impl InstrumentRecord {
    /// Creates a record with the instrument's default day count.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            day_count: None,
        }
    }

    /// Overrides the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }
}

/// Instrument records and their quotes, aligned by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSet {
    /// Instrument records.
    pub instruments: Vec<InstrumentRecord>,
    /// Quotes, one entry per record.
    pub quotes: Vec<AssetQuote>,
}

impl InstrumentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instrument with its quotes.
    #[must_use]
    pub fn with(mut self, record: InstrumentRecord, quotes: Vec<Quote>) -> Self {
        self.quotes.push(AssetQuote::new(record.id.clone(), quotes));
        self.instruments.push(record);
        self
    }

    /// Appends an instrument quoted by a single market quote.
    #[must_use]
    pub fn with_market_quote(self, id: &str, value: Decimal) -> Self {
        self.with(InstrumentRecord::new(id), vec![Quote::market(value)])
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True when the set has no instruments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Checks the structural invariants of the set.
    ///
    /// The set must be non-empty, records and quotes must have the same
    /// length and agree on ids position by position, ids must be unique,
    /// and every instrument must carry exactly one valued quote of `measure`.
    pub fn validate(&self, measure: MeasureType) -> CurveResult<()> {
        if self.instruments.is_empty() {
            return Err(CurveError::invalid_set("no instruments"));
        }
        if self.instruments.len() != self.quotes.len() {
            return Err(CurveError::invalid_set(format!(
                "{} instruments but {} quotes",
                self.instruments.len(),
                self.quotes.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.instruments.len());
        for (position, (record, quote)) in self.instruments.iter().zip(&self.quotes).enumerate() {
            if record.id != quote.instrument_id {
                return Err(CurveError::invalid_set(format!(
                    "position {position}: instrument {} quoted as {}",
                    record.id, quote.instrument_id
                )));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(CurveError::invalid_set(format!(
                    "duplicate instrument {}",
                    record.id
                )));
            }
            quote.select(measure).map_err(|e| CurveError::invalid_set(e.to_string()))?;
        }
        Ok(())
    }

    /// Set with every asset quote normalised.
    #[must_use]
    pub fn normalised(&self) -> Self {
        Self {
            instruments: self.instruments.clone(),
            quotes: self.quotes.iter().map(AssetQuote::normalised).collect(),
        }
    }

    /// Records paired with their selected quote values.
    pub fn selected(&self, measure: MeasureType) -> CurveResult<Vec<(&InstrumentRecord, f64)>> {
        self.validate(measure)?;
        self.instruments
            .iter()
            .zip(&self.quotes)
            .map(|(record, quote)| Ok((record, quote.select_value(measure)?)))
            .collect()
    }
}
