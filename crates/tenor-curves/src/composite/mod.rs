//! Curves defined relative to other curves.
//!
//! - Spread curves: factors over a base discount curve, calibrated so that
//!   each spread instrument reprices at its base level plus the quoted spread
//! - Cross-currency spread curves: a synthetic short end from FX forwards
//!   and a foreign curve, quoted spreads beyond the cut-over
//! - FX-derived curves: the ratio of two built curves, never materialised
//!
//! Spread and cross-currency curves are [`Curve`](crate::curve::Curve)s with
//! a composite [`CurveKind`](crate::curve::CurveKind); this module holds the
//! point generation they share.

mod fx_derived;
mod spread;
mod xccy;

pub use fx_derived::FxDerivedCurve;
pub use spread::spread_targets;
pub use xccy::{generate_rate_curve, is_short_end, synthetic_discount_factor};

pub(crate) use xccy::{long_end, short_end_factors};
