//! Volatility surfaces over (expiry, strike).

use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::Date;
use tenor_math::interpolation::BilinearInterpolator;

use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::term_curve::{ClosestValue, Point};

/// Volatilities on an expiry × strike grid with bilinear interpolation.
///
/// Expiries are placed on a time axis from the base date using the
/// configured day count. Outside the grid the surface is flat along each
/// axis when extrapolation is permitted, and an error otherwise.
#[derive(Debug, Clone)]
pub struct VolatilitySurface {
    base_date: Date,
    day_count: DayCountConvention,
    expiries: Vec<Date>,
    extrapolation_permitted: bool,
    grid: BilinearInterpolator,
}

impl VolatilitySurface {
    /// Creates a surface from one row of volatilities per expiry.
    ///
    /// # Errors
    ///
    /// - `NonMonotonicPoints` if expiries are not strictly increasing or
    ///   fall on or before the base date
    /// - `InsufficientPoints` / `Math` if the grid is smaller than 2×2 or
    ///   the rows do not match the strikes
    pub fn new(
        base_date: Date,
        expiries: Vec<Date>,
        strikes: Vec<f64>,
        vols: Vec<Vec<f64>>,
        config: &CurveConfig,
    ) -> CurveResult<Self> {
        let mut previous = base_date;
        for (index, expiry) in expiries.iter().enumerate() {
            if *expiry <= previous {
                return Err(CurveError::NonMonotonicPoints {
                    index,
                    previous: previous.to_string(),
                    current: expiry.to_string(),
                });
            }
            previous = *expiry;
        }
        if expiries.len() < 2 {
            return Err(CurveError::InsufficientPoints {
                required: 2,
                got: expiries.len(),
            });
        }

        let times = expiries
            .iter()
            .map(|e| config.day_count.year_fraction(base_date, *e))
            .collect();
        let mut grid = BilinearInterpolator::new(times, strikes, vols)?;
        if config.extrapolation_permitted {
            grid = grid.with_extrapolation();
        }

        Ok(Self {
            base_date,
            day_count: config.day_count,
            expiries,
            extrapolation_permitted: config.extrapolation_permitted,
            grid,
        })
    }

    /// Volatility at an (expiry, strike) point.
    pub fn value(&self, point: &Point) -> CurveResult<f64> {
        let (t, strike) = self.coordinates(point)?;
        if !self.extrapolation_permitted {
            self.check_range(t)?;
        }
        Ok(self.grid.interpolate(t, strike)?)
    }

    /// The grid expiries either side of `point`, valued at its strike.
    ///
    /// `None` when the expiry is a grid node.
    pub fn closest_values(&self, point: &Point) -> CurveResult<Option<(ClosestValue, ClosestValue)>> {
        let (t, strike) = self.coordinates(point)?;
        self.check_range(t)?;

        let times = self.grid.xs();
        let i = times.partition_point(|x| *x < t);
        if times[i] == t {
            return Ok(None);
        }
        let node = |k: usize| -> CurveResult<ClosestValue> {
            Ok(ClosestValue {
                date: self.expiries[k],
                time: times[k],
                value: self.grid.interpolate(times[k], strike)?,
            })
        };
        Ok(Some((node(i - 1)?, node(i)?)))
    }

    /// Base date of the surface.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Grid expiries.
    #[must_use]
    pub fn expiries(&self) -> &[Date] {
        &self.expiries
    }

    /// Grid strikes.
    #[must_use]
    pub fn strikes(&self) -> &[f64] {
        self.grid.ys()
    }

    fn coordinates(&self, point: &Point) -> CurveResult<(f64, f64)> {
        match point {
            Point::ExpiryStrike { expiry, strike } => {
                Ok((self.day_count.year_fraction(self.base_date, *expiry), *strike))
            }
            other => Err(CurveError::invalid_point(format!(
                "surfaces are queried by expiry and strike, got {other:?}"
            ))),
        }
    }

    fn check_range(&self, t: f64) -> CurveResult<()> {
        let times = self.grid.xs();
        let (min, max) = (times[0], times[times.len() - 1]);
        if t < min || t > max || t.is_nan() {
            return Err(CurveError::ExtrapolationNotPermitted {
                coordinate: t,
                min,
                max,
            });
        }
        Ok(())
    }
}
