//! Day count conventions.
//!
//! Only the actual-day conventions used by money-market and curve time axes
//! are provided:
//!
//! - [`Act360`]: Actual/360, deposits and floating legs
//! - [`Act365Fixed`]: Actual/365 Fixed, the interpolation time axis
//!
//! # Usage
//!
//! ```rust
//! use tenor_core::daycounts::{DayCount, Act365Fixed};
//! use tenor_core::types::Date;
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 1, 1).unwrap();
//! assert!((Act365Fixed.year_fraction(start, end) - 366.0 / 365.0).abs() < 1e-15);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
pub trait DayCount: Send + Sync {
    /// Convention name (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Year fraction between two dates; negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/360.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 360.0
    }
}

/// Actual/365 Fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }
}

/// Runtime-selectable day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    #[default]
    Act365Fixed,
}

impl DayCountConvention {
    /// Returns the convention as a trait object.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
        }
    }

    /// Year fraction between two dates under this convention.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
        }
    }

    /// Convention name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => Act360.name(),
            DayCountConvention::Act365Fixed => Act365Fixed.name(),
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACTUAL/365" | "ACT365" | "ACT/365.FIXED" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            _ => Err(CoreError::UnknownConvention {
                kind: "day count",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_act360_quarter() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 4, 1).unwrap();

        assert_eq!(Act360.day_count(start, end), 90);
        assert_relative_eq!(Act360.year_fraction(start, end), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_act365_leap_year() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();

        assert_eq!(Act365Fixed.day_count(start, end), 366);
        assert!(Act365Fixed.year_fraction(start, end) > 1.0);
    }

    #[test]
    fn test_convention_parsing() {
        assert_eq!(
            "ACT/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            "act/365f".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act365Fixed
        );
        assert!("30/360".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_convention_dispatch_matches_struct() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 3, 1).unwrap();
        let dc = DayCountConvention::Act360.to_day_count();
        assert_relative_eq!(
            dc.year_fraction(start, end),
            DayCountConvention::Act360.year_fraction(start, end)
        );
    }
}
