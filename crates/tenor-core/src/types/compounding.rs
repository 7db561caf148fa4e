//! Interest compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interest compounding convention.
///
/// Curves default to continuous compounding for zero-rate transforms.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::Compounding;
///
/// let df = Compounding::Continuous.discount_factor(0.05, 2.0);
/// let rate = Compounding::Continuous.zero_rate(df, 2.0);
/// assert!((rate - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest (no compounding)
    Simple,
    /// Annual compounding (1x per year)
    Annual,
    /// Semi-annual compounding (2x per year)
    SemiAnnual,
    /// Quarterly compounding (4x per year)
    Quarterly,
    /// Monthly compounding (12x per year)
    Monthly,
    /// Continuous compounding
    #[default]
    Continuous,
}

impl Compounding {
    /// Periods per year, `None` for simple and continuous.
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
            Compounding::Simple | Compounding::Continuous => None,
        }
    }

    /// Discount factor for a zero rate over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            Compounding::Continuous => (-rate * t).exp(),
            _ => {
                let n = f64::from(self.periods_per_year().unwrap_or(1));
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Zero rate implied by a discount factor over `t` years.
    ///
    /// The caller must ensure `t != 0`; the result is non-finite otherwise.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        match self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Continuous => -df.ln() / t,
            _ => {
                let n = f64::from(self.periods_per_year().unwrap_or(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semi-Annual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor_simple() {
        let df = Compounding::Simple.discount_factor(0.05, 0.5);
        assert_relative_eq!(df, 1.0 / 1.025, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip_all_compounding() {
        for compounding in [
            Compounding::Continuous,
            Compounding::Annual,
            Compounding::SemiAnnual,
            Compounding::Quarterly,
            Compounding::Monthly,
            Compounding::Simple,
        ] {
            let df = compounding.discount_factor(0.05, 2.0);
            assert_relative_eq!(compounding.zero_rate(df, 2.0), 0.05, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_default_is_continuous() {
        assert_eq!(Compounding::default(), Compounding::Continuous);
        assert_eq!(Compounding::Continuous.periods_per_year(), None);
    }
}
