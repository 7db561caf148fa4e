//! Calendar date type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::{Period, TimeUnit};

/// A calendar date used as a curve coordinate.
///
/// Newtype over `chrono::NaiveDate`; serializes as an ISO 8601 string.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::Date;
///
/// let date = Date::from_ymd(2024, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (YYYY-MM-DD).
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months, clamping the day to the end of the target month.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;
        let new_day = self.day().min(days_in_month(new_year, new_month));

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years, clamping 29 February when needed.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Adds a tenor to the date.
    ///
    /// Day and week tenors are calendar-day offsets; month and year tenors
    /// roll the month with end-of-month clamping. No business-day adjustment.
    pub fn add_period(&self, period: Period) -> CoreResult<Self> {
        match period.unit {
            TimeUnit::Days => Ok(self.add_days(i64::from(period.length))),
            TimeUnit::Weeks => Ok(self.add_days(7 * i64::from(period.length))),
            TimeUnit::Months => self.add_months(period.length),
            TimeUnit::Years => self.add_years(period.length),
        }
    }

    /// Calendar days from `self` to `other` (negative when `other` is earlier).
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_clamps_end_of_month() {
        let d = Date::from_ymd(2023, 1, 31).unwrap();
        assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2023, 2, 28).unwrap());
        assert_eq!(d.add_months(-2).unwrap(), Date::from_ymd(2022, 11, 30).unwrap());
        assert_eq!(d.add_months(12).unwrap(), Date::from_ymd(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_add_years_leap_day() {
        let d = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(d.add_years(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_add_period() {
        let base = Date::from_ymd(2024, 1, 1).unwrap();
        let one_month = base.add_period(Period::parse("1M").unwrap()).unwrap();
        let three_month = base.add_period(Period::parse("3M").unwrap()).unwrap();
        let one_week = base.add_period(Period::parse("1W").unwrap()).unwrap();

        assert_eq!(one_month, Date::from_ymd(2024, 2, 1).unwrap());
        assert_eq!(three_month, Date::from_ymd(2024, 4, 1).unwrap());
        assert_eq!(one_week, Date::from_ymd(2024, 1, 8).unwrap());
        assert_eq!(base.days_between(&three_month), 91);
    }

    #[test]
    fn test_parse_and_display() {
        let d = Date::parse("2024-03-15").unwrap();
        assert_eq!(d.to_string(), "2024-03-15");
        assert!(Date::parse("2024-13-01").is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_add_months_reversible_before_29th(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            months in -240i32..240,
        ) {
            let d = Date::from_ymd(year, month, day).unwrap();
            let there = d.add_months(months).unwrap();
            proptest::prop_assert_eq!(there.add_months(-months).unwrap(), d);
        }
    }

    #[test]
    fn test_serde_transparent() {
        let d = Date::from_ymd(2025, 1, 1).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2025-01-01\"");
        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
