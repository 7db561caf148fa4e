//! Tenors such as `3M` or `10Y`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days
    Days,
    /// Weeks of seven days
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

/// A length of time expressed as a count of [`TimeUnit`]s.
///
/// Market shorthands are accepted: `ON` (one day), `TN` (two days), `SN`
/// (three days), and `<n><D|W|M|Y>`. Serializes as its tenor string.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::{Period, TimeUnit};
///
/// let p: Period = "18M".parse().unwrap();
/// assert_eq!(p.length, 18);
/// assert_eq!(p.unit, TimeUnit::Months);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit.
    pub unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Parses a tenor string.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let text = s.trim().to_ascii_uppercase();
        match text.as_str() {
            "ON" | "O/N" => return Ok(Self::new(1, TimeUnit::Days)),
            "TN" | "T/N" => return Ok(Self::new(2, TimeUnit::Days)),
            "SN" | "S/N" => return Ok(Self::new(3, TimeUnit::Days)),
            _ => {}
        }

        let Some(unit_char) = text.chars().last() else {
            return Err(CoreError::invalid_tenor(s, "empty tenor"));
        };
        let unit = match unit_char {
            'D' => TimeUnit::Days,
            'W' => TimeUnit::Weeks,
            'M' => TimeUnit::Months,
            'Y' => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_tenor(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };
        let digits = &text[..text.len() - unit_char.len_utf8()];
        let length = digits
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_tenor(s, "missing or invalid length"))?;
        if length < 0 {
            return Err(CoreError::invalid_tenor(s, "negative length"));
        }

        Ok(Self::new(length, unit))
    }

    /// Rough length in years, used only for ordering and diagnostics.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.length);
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => n * 7.0 / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Period::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.length, unit)
    }
}
