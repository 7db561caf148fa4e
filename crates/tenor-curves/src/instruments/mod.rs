//! Priceable instruments consumed by the bootstrapper.
//!
//! The engine only needs the [`PriceableInstrument`] capability: a quote to
//! match, a maturity to place the point at, and a way to read the implied
//! quote off a trial curve. Valuation detail stays inside each instrument.
//!
//! # Reference Instruments
//!
//! - [`Deposit`]: simple-rate money market deposit (direct inversion)
//! - [`Swap`]: par swap, also used for basis swaps (root-solved)
//! - [`FxSpot`], [`FxForward`]: outright FX levels
//! - [`VolatilityQuote`]: an at-the-money volatility for one expiry
//!
//! Instruments are created from quoted records by an [`InstrumentFactory`];
//! [`StandardInstrumentFactory`] understands ids of the form
//! `CCY-Type-Tenor`, e.g. `USD-Deposit-3M` or `AUDUSD-FxForward-6M`.

mod deposit;
mod factory;
mod fx;
mod swap;
mod volatility;

pub use deposit::Deposit;
pub use factory::{InstrumentFactory, StandardInstrumentFactory};
pub use fx::{FxForward, FxSpot};
pub use swap::Swap;
pub use volatility::VolatilityQuote;

use std::fmt;
use std::sync::Arc;
use tenor_core::types::Date;

use crate::error::CurveResult;
use crate::term_structure::TermStructure;

/// Instrument category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentKind {
    /// Money market deposit
    Deposit,
    /// Fixed-for-floating par swap
    Swap,
    /// Basis swap
    BasisSwap,
    /// FX spot
    FxSpot,
    /// Outright FX forward
    FxForward,
    /// Volatility quote
    Volatility,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deposit => "Deposit",
            Self::Swap => "Swap",
            Self::BasisSwap => "BasisSwap",
            Self::FxSpot => "FxSpot",
            Self::FxForward => "FxForward",
            Self::Volatility => "Volatility",
        };
        write!(f, "{name}")
    }
}

/// Capability the bootstrapper needs from a calibration instrument.
///
/// Instruments are immutable; re-quoting produces a new instrument.
pub trait PriceableInstrument: Send + Sync + fmt::Debug {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Instrument category.
    fn kind(&self) -> InstrumentKind;

    /// Date at which the instrument's curve point is placed.
    fn risk_maturity_date(&self) -> Date;

    /// The quote calibration has to reproduce.
    fn market_quote(&self) -> f64;

    /// Same instrument quoted at `quote`.
    fn with_market_quote(&self, quote: f64) -> Arc<dyn PriceableInstrument>;

    /// Quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn TermStructure) -> CurveResult<f64>;

    /// Curve value at maturity that reprices the instrument exactly, when it
    /// can be written in closed form given the curve up to the start date.
    ///
    /// `None` means the point must be root-solved.
    fn value_at_maturity(&self, _curve: &dyn TermStructure) -> CurveResult<Option<f64>> {
        Ok(None)
    }
}
