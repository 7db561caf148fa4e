//! # Tenor Core
//!
//! Foundational types shared by the Tenor curve engine:
//!
//! - **Types**: [`Date`](types::Date), [`Period`](types::Period) tenors and
//!   [`Compounding`](types::Compounding) conventions
//! - **Day Count Conventions**: ACT/360 and ACT/365 Fixed year fractions
//!
//! ## Example
//!
//! ```rust
//! use tenor_core::prelude::*;
//!
//! let base = Date::from_ymd(2024, 1, 1).unwrap();
//! let maturity = base.add_period(Period::parse("3M").unwrap()).unwrap();
//! let tau = DayCountConvention::Act360.year_fraction(base, maturity);
//! assert!((tau - 91.0 / 360.0).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{Act360, Act365Fixed, DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Compounding, Date, Period, TimeUnit};
}

pub use error::{CoreError, CoreResult};
