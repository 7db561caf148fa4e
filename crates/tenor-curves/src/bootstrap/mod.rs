//! Curve bootstrap algorithms.
//!
//! # Bootstrap Methods
//!
//! - **Sequential Bootstrap**: Solves one curve point per instrument in
//!   maturity order, using previously solved points. Instruments with a
//!   closed-form maturity value are inverted directly; the rest are solved
//!   with Brent's method.
//!
//! - **Overlay Bootstrap**: The same strip, but the solved points are
//!   factors multiplied onto a base term structure. Spread and
//!   cross-currency curves calibrate this way.
//!
//! - **Spread Solver**: Calibrates per-instrument quote adjustments so a
//!   rebuilt discount curve matches quoted spreads over the unadjusted one.
//!
//! # Example: Sequential Bootstrap
//!
//! ```rust,ignore
//! use tenor_curves::bootstrap::{BootstrapSettings, Bootstrapper};
//!
//! let settings = BootstrapSettings::new(base_date, &config);
//! let term_curve = Bootstrapper::new(settings).bootstrap(&instruments)?;
//! ```

mod sequential;
pub mod spread_solver;

pub use sequential::{BootstrapSettings, Bootstrapper};
pub use spread_solver::{create_adjusted_curve, DiscountCurveSolver};
