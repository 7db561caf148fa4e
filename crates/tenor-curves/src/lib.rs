//! # Tenor Curves
//!
//! Curve calibration for the Tenor engine.
//!
//! This crate provides:
//!
//! - **Quotes**: Instrument sets with typed quote measures and validation
//! - **Instruments**: The [`PriceableInstrument`](instruments::PriceableInstrument)
//!   capability and reference deposits, swaps, FX and volatility quotes
//! - **Bootstrap**: Sequential strip with closed-form inversion, Brent root
//!   solving and overlay calibration over a base curve
//! - **Curves**: The [`Curve`](curve::Curve) lifecycle for discount, FX,
//!   volatility, spread and cross-currency curves, with perturbation and
//!   risk sets
//! - **Composites**: Spread targets, the synthetic cross-currency short end
//!   and lazily derived FX curves
//! - **Surfaces**: Bilinear volatility surfaces over expiry and strike
//! - **Configuration**: Per-algorithm settings loaded from TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tenor_curves::prelude::*;
//!
//! let set = InstrumentSet::new()
//!     .with_market_quote("USD-Deposit-1M", dec!(0.05))
//!     .with_market_quote("USD-Deposit-3M", dec!(0.051))
//!     .with_market_quote("USD-Deposit-1Y", dec!(0.0525));
//!
//! let identifier = CurveIdentifier::new(
//!     "USD-OIS", base_date, "LogLinear", StructureType::DiscountCurve, "USD",
//! );
//! let config = AlgorithmTable::with_defaults().resolve(&identifier)?;
//! let curve = Curve::from_instruments(
//!     identifier, config, CurveKind::Discount, &set, &StandardInstrumentFactory::new(),
//! )?;
//!
//! let df = curve.discount_factor(Date::from_ymd(2024, 3, 1)?)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_lines)]

pub mod bootstrap;
pub mod composite;
pub mod config;
pub mod curve;
pub mod error;
pub mod instruments;
pub mod interpolator;
pub mod quotes;
pub mod repricing;
pub mod surface;
pub mod term_curve;
pub mod term_structure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        create_adjusted_curve, BootstrapSettings, Bootstrapper, DiscountCurveSolver,
    };
    pub use crate::composite::{generate_rate_curve, spread_targets, FxDerivedCurve};
    pub use crate::config::{
        AlgorithmTable, CurveConfig, CurveIdentifier, DuplicatePointPolicy, QuoteBasis,
        StructureType,
    };
    pub use crate::curve::{BuildOutcome, Curve, CurveKind, CurveStatus};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{
        Deposit, FxForward, FxSpot, InstrumentFactory, InstrumentKind, PriceableInstrument,
        StandardInstrumentFactory, Swap, VolatilityQuote,
    };
    pub use crate::interpolator::CurveInterpolator;
    pub use crate::quotes::{AssetQuote, InstrumentRecord, InstrumentSet, MeasureType, Quote};
    pub use crate::repricing::{RepricingCheck, RepricingReport};
    pub use crate::surface::VolatilitySurface;
    pub use crate::term_curve::{ClosestValue, CurvePoint, InterpolationMethod, Point, TermCurve};
    pub use crate::term_structure::TermStructure;
    pub use tenor_core::types::{Compounding, Date, Period};
}

pub use error::{CurveError, CurveResult};
