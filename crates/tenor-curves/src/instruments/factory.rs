//! Creation of priceable instruments from quoted records.

use std::sync::Arc;
use tenor_core::types::{Date, Period};

use super::{Deposit, FxForward, FxSpot, PriceableInstrument, Swap, VolatilityQuote};
use crate::error::{CurveError, CurveResult};
use crate::quotes::InstrumentRecord;

/// Turns an instrument record and its selected quote into a priceable
/// instrument.
pub trait InstrumentFactory: Send + Sync {
    /// Creates the instrument for `record`, quoted at `quote`, relative to
    /// the curve's base date.
    fn create(
        &self,
        record: &InstrumentRecord,
        quote: f64,
        base_date: Date,
    ) -> CurveResult<Arc<dyn PriceableInstrument>>;
}

/// Factory for ids of the form `CCY-Type-Tenor`.
///
/// | Type | Instrument | Schedule |
/// |------|------------|----------|
/// | `Deposit` | [`Deposit`] | single period |
/// | `Swap`, `IRSwap` | [`Swap`] | annual fixed leg |
/// | `BasisSwap` | [`Swap`] tagged as basis | quarterly |
/// | `FxSpot` | [`FxSpot`] | settles at tenor (usually `0D`) |
/// | `FxForward` | [`FxForward`] | |
/// | `Volatility`, `Vol` | [`VolatilityQuote`] | |
///
/// Every instrument starts on the base date. Tenors roll by calendar months
/// with end-of-month clamping; no holiday calendar is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardInstrumentFactory;

impl StandardInstrumentFactory {
    /// Creates the factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse_id(id: &str) -> CurveResult<(&str, Period)> {
        let mut parts = id.rsplitn(3, '-');
        let (Some(tenor), Some(kind), Some(_currency)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CurveError::invalid_instrument(
                id,
                "expected an id of the form CCY-Type-Tenor",
            ));
        };
        let tenor = Period::parse(tenor)
            .map_err(|e| CurveError::invalid_instrument(id, e.to_string()))?;
        Ok((kind, tenor))
    }
}

impl InstrumentFactory for StandardInstrumentFactory {
    fn create(
        &self,
        record: &InstrumentRecord,
        quote: f64,
        base_date: Date,
    ) -> CurveResult<Arc<dyn PriceableInstrument>> {
        let id = record.id.as_str();
        let (kind, tenor) = Self::parse_id(id)?;
        let maturity = base_date.add_period(tenor)?;

        let instrument: Arc<dyn PriceableInstrument> = match kind {
            "Deposit" => {
                let mut deposit = Deposit::new(id, base_date, maturity, quote);
                if let Some(day_count) = record.day_count {
                    deposit = deposit.with_day_count(day_count);
                }
                Arc::new(deposit)
            }
            "Swap" | "IRSwap" | "BasisSwap" => {
                let frequency = if kind == "BasisSwap" { 3 } else { 12 };
                let mut swap = Swap::new(id, base_date, maturity, quote, frequency)?;
                if kind == "BasisSwap" {
                    swap = swap.as_basis_swap();
                }
                if let Some(day_count) = record.day_count {
                    swap = swap.with_day_count(day_count);
                }
                Arc::new(swap)
            }
            "FxSpot" => Arc::new(FxSpot::new(id, maturity, quote)),
            "FxForward" => Arc::new(FxForward::new(id, maturity, quote)),
            "Volatility" | "Vol" => Arc::new(VolatilityQuote::new(id, maturity, quote)),
            other => {
                return Err(CurveError::invalid_instrument(
                    id,
                    format!("unknown instrument type '{other}'"),
                ))
            }
        };
        Ok(instrument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::InstrumentKind;
    use tenor_core::daycounts::DayCountConvention;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_creates_each_kind() {
        let factory = StandardInstrumentFactory::new();
        let cases = [
            ("USD-Deposit-3M", InstrumentKind::Deposit),
            ("USD-Swap-5Y", InstrumentKind::Swap),
            ("USD-IRSwap-2Y", InstrumentKind::Swap),
            ("USD-BasisSwap-5Y", InstrumentKind::BasisSwap),
            ("AUDUSD-FxSpot-0D", InstrumentKind::FxSpot),
            ("AUDUSD-FxForward-6M", InstrumentKind::FxForward),
            ("USD-Volatility-1Y", InstrumentKind::Volatility),
        ];
        for (id, kind) in cases {
            let instrument = factory
                .create(&InstrumentRecord::new(id), 0.05, base())
                .unwrap();
            assert_eq!(instrument.kind(), kind, "{id}");
            assert_eq!(instrument.id(), id);
        }
    }

    #[test]
    fn test_month_end_clamping() {
        let factory = StandardInstrumentFactory::new();
        let deposit = factory
            .create(&InstrumentRecord::new("USD-Deposit-1M"), 0.05, base())
            .unwrap();
        assert_eq!(
            deposit.risk_maturity_date(),
            Date::from_ymd(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_day_count_override_is_applied() {
        let factory = StandardInstrumentFactory::new();
        let record =
            InstrumentRecord::new("GBP-Deposit-1Y").with_day_count(DayCountConvention::Act365Fixed);
        let deposit = factory.create(&record, 0.05, base()).unwrap();
        assert!(format!("{deposit:?}").contains("Act365Fixed"));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let factory = StandardInstrumentFactory::new();
        for id in ["Deposit-3M", "USD-Deposit-3Q", "USD-Bond-5Y", "USD-Deposit-"] {
            let err = factory
                .create(&InstrumentRecord::new(id), 0.05, base())
                .unwrap_err();
            assert!(matches!(err, CurveError::InvalidInstrument { .. }), "{id}");
        }
    }
}
