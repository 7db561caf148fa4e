//! The calibrated curve engine.
//!
//! One [`Curve`] type serves every structure. What differs between a
//! discount curve, an FX curve, a volatility curve and the composite curves
//! is captured by [`CurveKind`]: which quote measure is calibrated, what the
//! seed point is, whether points are values or factors over a base curve,
//! and how `value()` combines them.
//!
//! # Lifecycle
//!
//! ```text
//! Unbuilt ──bind_assets──► AssetsBound ──build──► Ready
//!                                      (Bootstrapped, InterpolatorSet)
//! ```
//!
//! `build` calibrates into a fresh state and swaps it in with a single
//! assignment, so readers never see points and interpolator out of step.
//! A failed build leaves the previous state untouched.

use std::fmt;
use std::sync::Arc;
use tenor_core::types::{Compounding, Date};
use tracing::{debug, info, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bootstrap::{BootstrapSettings, Bootstrapper};
use crate::composite::{long_end, short_end_factors, spread_targets};
use crate::config::{CurveConfig, CurveIdentifier, StructureType};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{InstrumentFactory, InstrumentKind, PriceableInstrument};
use crate::interpolator::CurveInterpolator;
use crate::quotes::{InstrumentSet, MeasureType};
use crate::repricing::{RepricingCheck, RepricingReport};
use crate::term_curve::{ClosestValue, Point, TermCurve};
use crate::term_structure::TermStructure;

/// Build progress of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveStatus {
    /// Nothing bound or calibrated.
    Unbuilt,
    /// Instruments bound, not yet calibrated.
    AssetsBound,
    /// Points solved.
    Bootstrapped,
    /// Interpolator built over the solved points.
    InterpolatorSet,
    /// Queryable.
    Ready,
}

impl fmt::Display for CurveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// What a call to [`Curve::build`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The curve was calibrated and now has `points` points.
    Rebuilt {
        /// Number of calibrated points.
        points: usize,
    },
    /// Stored points were kept; nothing was calibrated.
    NothingToDo,
}

/// Structure-specific behaviour of a curve.
#[derive(Debug, Clone)]
pub enum CurveKind {
    /// Discount factors bootstrapped from rate instruments.
    Discount,
    /// Outright FX levels, seeded with spot.
    Fx,
    /// Volatility term structure, flat before the first expiry.
    Volatility,
    /// Spread factors over a base discount curve.
    Spread {
        /// The base curve.
        base: Arc<Curve>,
    },
    /// Cross-currency spread factors over a currency-1 base curve.
    XccySpread {
        /// Currency-1 discount curve.
        base: Arc<Curve>,
        /// FX curve of the pair.
        fx: Arc<Curve>,
        /// Currency-2 discount curve.
        currency2: Arc<Curve>,
    },
}

impl CurveKind {
    /// Structure type this kind builds.
    #[must_use]
    pub fn structure_type(&self) -> StructureType {
        match self {
            Self::Discount => StructureType::DiscountCurve,
            Self::Fx => StructureType::FxCurve,
            Self::Volatility => StructureType::VolatilityCurve,
            Self::Spread { .. } => StructureType::RateSpreadCurve,
            Self::XccySpread { .. } => StructureType::XccySpreadCurve,
        }
    }

    /// Quote measure the kind calibrates to.
    #[must_use]
    pub fn measure(&self) -> MeasureType {
        match self {
            Self::Discount | Self::Fx => MeasureType::MarketQuote,
            Self::Volatility => MeasureType::Volatility,
            Self::Spread { .. } | Self::XccySpread { .. } => MeasureType::Spread,
        }
    }

    /// The curve spread points are layered on.
    #[must_use]
    pub fn spread_base(&self) -> Option<&Arc<Curve>> {
        match self {
            Self::Spread { base } | Self::XccySpread { base, .. } => Some(base),
            _ => None,
        }
    }

    /// True when the curve value is a discount factor.
    #[must_use]
    pub fn is_rate_curve(&self) -> bool {
        !matches!(self, Self::Fx | Self::Volatility)
    }

    fn dependencies(&self) -> Vec<&Arc<Curve>> {
        match self {
            Self::Spread { base } => vec![base],
            Self::XccySpread { base, fx, currency2 } => vec![base, fx, currency2],
            _ => Vec::new(),
        }
    }

    fn with_base(&self, new_base: Arc<Curve>) -> Self {
        match self {
            Self::Spread { .. } => Self::Spread { base: new_base },
            Self::XccySpread { fx, currency2, .. } => Self::XccySpread {
                base: new_base,
                fx: Arc::clone(fx),
                currency2: Arc::clone(currency2),
            },
            other => other.clone(),
        }
    }
}

/// Points, interpolator and the instruments they reprice, swapped as one.
#[derive(Debug, Clone)]
struct CalibratedState {
    term_curve: TermCurve,
    interpolator: Arc<CurveInterpolator>,
    calibration_instruments: Vec<Arc<dyn PriceableInstrument>>,
}

/// A calibrated, queryable curve.
#[derive(Debug, Clone)]
pub struct Curve {
    identifier: CurveIdentifier,
    config: CurveConfig,
    kind: CurveKind,
    instruments: Vec<Arc<dyn PriceableInstrument>>,
    /// Quoted spread per instrument; empty unless the kind is a spread.
    spreads: Vec<f64>,
    state: Option<CalibratedState>,
    status: CurveStatus,
    /// State was loaded from stored points rather than calibrated.
    stored: bool,
}

#[derive(Debug, Clone, Copy)]
enum RiskTask {
    Own(usize),
    Base(usize),
}

impl Curve {
    /// Creates an unbuilt curve.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration is unusable or the kind does
    ///   not match the identifier's structure type
    /// - `DependencyNotReady` if a referenced curve is not built
    pub fn new(identifier: CurveIdentifier, config: CurveConfig, kind: CurveKind) -> CurveResult<Self> {
        config.validate()?;
        if kind.structure_type() != identifier.structure_type {
            return Err(CurveError::invalid_config(format!(
                "curve {} is a {} but was given a {} kind",
                identifier.id,
                identifier.structure_type,
                kind.structure_type()
            )));
        }
        let curve = Self {
            identifier,
            config,
            kind,
            instruments: Vec::new(),
            spreads: Vec::new(),
            state: None,
            status: CurveStatus::Unbuilt,
            stored: false,
        };
        curve.ensure_dependencies_ready()?;
        Ok(curve)
    }

    /// Creates and builds a curve from quoted instruments.
    pub fn from_instruments(
        identifier: CurveIdentifier,
        config: CurveConfig,
        kind: CurveKind,
        set: &InstrumentSet,
        factory: &dyn InstrumentFactory,
    ) -> CurveResult<Self> {
        let mut curve = Self::new(identifier, config, kind)?;
        curve.bind_assets(set, factory)?;
        curve.build()?;
        Ok(curve)
    }

    /// Creates a curve from already calibrated instruments and builds it.
    pub fn from_priceable_instruments(
        identifier: CurveIdentifier,
        config: CurveConfig,
        kind: CurveKind,
        instruments: Vec<Arc<dyn PriceableInstrument>>,
    ) -> CurveResult<Self> {
        if kind.spread_base().is_some() {
            return Err(CurveError::invalid_config(
                "spread curves need quoted spreads; use from_instruments",
            ));
        }
        let mut curve = Self::new(identifier, config, kind)?;
        curve.instruments = instruments;
        curve.status = CurveStatus::AssetsBound;
        curve.build()?;
        Ok(curve)
    }

    /// Creates a curve from stored points.
    ///
    /// Non-empty points make the curve ready immediately, and later builds
    /// keep them unless `bootstrap_override` is configured. Empty points
    /// leave the curve unbuilt.
    pub fn from_term_curve(
        identifier: CurveIdentifier,
        config: CurveConfig,
        kind: CurveKind,
        term_curve: TermCurve,
    ) -> CurveResult<Self> {
        let mut curve = Self::new(identifier, config, kind)?;
        if term_curve.is_empty() {
            debug!(curve = %curve.identifier.id, "stored curve has no points");
            return Ok(curve);
        }
        let interpolator =
            CurveInterpolator::new(&term_curve, curve.identifier.base_date, &curve.config)?;
        curve.state = Some(CalibratedState {
            term_curve,
            interpolator: Arc::new(interpolator),
            calibration_instruments: Vec::new(),
        });
        curve.status = CurveStatus::Ready;
        curve.stored = true;
        Ok(curve)
    }

    /// Binds instruments and returns the curve, for chaining.
    pub fn with_assets(
        mut self,
        set: &InstrumentSet,
        factory: &dyn InstrumentFactory,
    ) -> CurveResult<Self> {
        self.bind_assets(set, factory)?;
        Ok(self)
    }

    /// Validates `set` and creates the calibration instruments.
    ///
    /// Discount and FX curves calibrate to market quotes (any spread quote
    /// is folded in first), volatility curves to volatility quotes, spread
    /// curves to spread quotes. With `strip_basis_swaps`, basis swaps are
    /// dropped from spread inputs. Cross-currency curves keep only quotes
    /// maturing after the cut-over date; the short end is synthetic.
    ///
    /// On error nothing about the curve changes.
    pub fn bind_assets(&mut self, set: &InstrumentSet, factory: &dyn InstrumentFactory) -> CurveResult<()> {
        let base_date = self.identifier.base_date;
        let is_spread = self.kind.spread_base().is_some();

        let normalised;
        let set = if matches!(self.kind, CurveKind::Discount) {
            normalised = set.normalised();
            &normalised
        } else {
            set
        };

        let mut instruments = Vec::with_capacity(set.len());
        let mut spreads = Vec::new();
        for (record, value) in set.selected(self.kind.measure())? {
            if is_spread {
                let instrument = factory.create(record, 0.0, base_date)?;
                if self.config.strip_basis_swaps && instrument.kind() == InstrumentKind::BasisSwap {
                    debug!(curve = %self.identifier.id, instrument = %record.id, "basis swap stripped");
                    continue;
                }
                instruments.push(instrument);
                spreads.push(value);
            } else {
                instruments.push(factory.create(record, value, base_date)?);
            }
        }
        if matches!(self.kind, CurveKind::XccySpread { .. }) {
            let cut_over_date = base_date.add_period(self.config.cut_over)?;
            let quoted = instruments.len();
            (instruments, spreads) = long_end(&instruments, &spreads, cut_over_date);
            if instruments.len() < quoted {
                debug!(
                    curve = %self.identifier.id,
                    %cut_over_date,
                    dropped = quoted - instruments.len(),
                    "spread quotes inside the synthetic short end dropped"
                );
            }
        }
        if instruments.is_empty() {
            return Err(CurveError::invalid_set(format!(
                "no instruments left for {}",
                self.identifier.id
            )));
        }

        self.instruments = instruments;
        self.spreads = spreads;
        if self.state.is_none() {
            self.status = CurveStatus::AssetsBound;
        }
        trace!(curve = %self.identifier.id, status = %self.status, "assets bound");
        Ok(())
    }

    /// Calibrates the curve from its bound instruments.
    ///
    /// Curves loaded from stored points return
    /// [`BuildOutcome::NothingToDo`] unless `bootstrap_override` is set.
    ///
    /// # Errors
    ///
    /// - `DependencyNotReady` if a referenced curve is not built
    /// - `InvalidInstrumentSet` if no instruments are bound
    /// - anything the bootstrap raises; the previous state is kept
    pub fn build(&mut self) -> CurveResult<BuildOutcome> {
        self.ensure_dependencies_ready()?;
        if self.stored && !self.config.bootstrap_override {
            debug!(curve = %self.identifier.id, "keeping stored points");
            return Ok(BuildOutcome::NothingToDo);
        }
        if self.instruments.is_empty() {
            return Err(CurveError::invalid_set(format!(
                "no instruments bound to {}",
                self.identifier.id
            )));
        }

        info!(
            curve = %self.identifier.id,
            structure = %self.identifier.structure_type,
            instruments = self.instruments.len(),
            "building curve"
        );
        let state = self.calibrate().map_err(|e| {
            warn!(curve = %self.identifier.id, error = %e, "build rejected");
            e
        })?;

        let points = state.term_curve.points().len();
        self.state = Some(state);
        self.status = CurveStatus::Ready;
        self.stored = false;
        info!(curve = %self.identifier.id, points, "curve built");
        Ok(BuildOutcome::Rebuilt { points })
    }

    fn calibrate(&self) -> CurveResult<CalibratedState> {
        let base_date = self.identifier.base_date;
        let settings = BootstrapSettings::new(base_date, &self.config);

        let (term_curve, calibration_instruments) = match &self.kind {
            CurveKind::Discount => {
                let term_curve = Bootstrapper::new(settings).bootstrap(&self.instruments)?;
                (term_curve, self.instruments.clone())
            }
            CurveKind::Fx => {
                let spot = self
                    .instruments
                    .iter()
                    .find(|i| i.kind() == InstrumentKind::FxSpot)
                    .ok_or_else(|| CurveError::invalid_set("FX curve needs an FX spot quote"))?;
                let forwards: Vec<_> = self
                    .instruments
                    .iter()
                    .filter(|i| i.kind() != InstrumentKind::FxSpot)
                    .cloned()
                    .collect();
                let term_curve = Bootstrapper::new(settings.with_seed_value(spot.market_quote()))
                    .bootstrap(&forwards)?;
                (term_curve, self.instruments.clone())
            }
            CurveKind::Volatility => {
                let first = self
                    .instruments
                    .iter()
                    .min_by_key(|i| i.risk_maturity_date())
                    .ok_or_else(|| CurveError::invalid_set("no volatility quotes"))?;
                let term_curve = Bootstrapper::new(settings.with_seed_value(first.market_quote()))
                    .bootstrap(&self.instruments)?;
                (term_curve, self.instruments.clone())
            }
            CurveKind::Spread { base } => {
                let targets = spread_targets(base.as_ref(), &self.instruments, &self.spreads)?;
                let term_curve = Bootstrapper::new(settings)
                    .with_overlay(base.as_ref())
                    .bootstrap(&targets)?;
                (term_curve, targets)
            }
            CurveKind::XccySpread { base, fx, currency2 } => {
                let cut_over_date = base_date.add_period(self.config.cut_over)?;
                let short_end =
                    short_end_factors(base, fx, currency2, self.config.quote_basis, cut_over_date)?;
                debug!(
                    curve = %self.identifier.id,
                    %cut_over_date,
                    synthetic = short_end.len(),
                    quoted = self.instruments.len(),
                    "cross-currency partition"
                );
                let targets = spread_targets(base.as_ref(), &self.instruments, &self.spreads)?;
                let term_curve = Bootstrapper::new(settings)
                    .with_overlay(base.as_ref())
                    .with_fixed_points(short_end)
                    .bootstrap(&targets)?;
                (term_curve, targets)
            }
        };
        trace!(curve = %self.identifier.id, status = %CurveStatus::Bootstrapped);

        let interpolator = CurveInterpolator::new(&term_curve, base_date, &self.config)?;
        trace!(curve = %self.identifier.id, status = %CurveStatus::InterpolatorSet);

        Ok(CalibratedState {
            term_curve,
            interpolator: Arc::new(interpolator),
            calibration_instruments,
        })
    }

    fn ensure_dependencies_ready(&self) -> CurveResult<()> {
        for dependency in self.kind.dependencies() {
            if !dependency.is_ready() {
                return Err(CurveError::dependency_not_ready(dependency.id()));
            }
        }
        Ok(())
    }

    fn state(&self) -> CurveResult<&CalibratedState> {
        self.state.as_ref().ok_or_else(|| CurveError::CurveNotReady {
            curve: self.identifier.id.clone(),
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Curve value at a point.
    ///
    /// Spread curves return `base(p) × factor(p)`.
    pub fn value(&self, point: &Point) -> CurveResult<f64> {
        let own = self.state()?.interpolator.value(point)?;
        match self.kind.spread_base() {
            Some(base) => Ok(base.value(point)? * own),
            None => Ok(own),
        }
    }

    /// Calibrated points. For spread curves these are factors over the base.
    pub fn term_curve(&self) -> CurveResult<&TermCurve> {
        Ok(&self.state()?.term_curve)
    }

    /// The calibrated points either side of `point`; `None` on an exact hit.
    pub fn closest_values(&self, point: &Point) -> CurveResult<Option<(ClosestValue, ClosestValue)>> {
        self.state()?.interpolator.closest_values(point)
    }

    /// Discount factor at `date`.
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        self.ensure_rate_curve()?;
        self.value(&Point::Date(date))
    }

    /// Zero rate to `date` with the given compounding.
    pub fn zero_rate(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        let t = self.time_of(date);
        if t == 0.0 {
            return Err(CurveError::zero_year_fraction(format!(
                "zero rate of {} at its base date",
                self.identifier.id
            )));
        }
        let df = self.discount_factor(date)?;
        if df <= 0.0 {
            return Err(CurveError::invalid_point(format!(
                "discount factor {df} at {date}"
            )));
        }
        Ok(compounding.zero_rate(df, t))
    }

    /// Discount factor from `start` to `end`.
    pub fn forward_discount_factor(&self, start: Date, end: Date) -> CurveResult<f64> {
        let df_start = self.discount_factor(start)?;
        if df_start == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "discount factor at {start}"
            )));
        }
        Ok(self.discount_factor(end)? / df_start)
    }

    /// Simple forward rate between two dates on the curve's day count.
    pub fn forward_rate(&self, start: Date, end: Date) -> CurveResult<f64> {
        let tau = self.config.day_count.year_fraction(start, end);
        if tau == 0.0 {
            return Err(CurveError::zero_year_fraction(format!(
                "forward from {start} to {end}"
            )));
        }
        let df_start = self.discount_factor(start)?;
        let df_end = self.discount_factor(end)?;
        if df_end == 0.0 {
            return Err(CurveError::division_by_zero(format!(
                "discount factor at {end}"
            )));
        }
        Ok((df_start / df_end - 1.0) / tau)
    }

    /// Outright FX forward at `date`.
    pub fn forward(&self, date: Date) -> CurveResult<f64> {
        if !matches!(self.kind, CurveKind::Fx) {
            return Err(CurveError::invalid_point(format!(
                "{} is not an FX curve",
                self.identifier.id
            )));
        }
        self.value(&Point::Date(date))
    }

    fn ensure_rate_curve(&self) -> CurveResult<()> {
        if self.kind.is_rate_curve() {
            Ok(())
        } else {
            Err(CurveError::invalid_point(format!(
                "{} does not hold discount factors",
                self.identifier.id
            )))
        }
    }

    /// Quote implied by the curve for each calibration instrument.
    pub fn implied_quotes(&self) -> CurveResult<Vec<(String, f64)>> {
        self.state()?
            .calibration_instruments
            .iter()
            .map(|instrument| Ok((instrument.id().to_string(), instrument.implied_quote(self)?)))
            .collect()
    }

    /// Target versus implied quote for each calibration instrument.
    pub fn repricing_report(&self) -> CurveResult<RepricingReport> {
        let checks = self
            .state()?
            .calibration_instruments
            .iter()
            .map(|instrument| {
                Ok(RepricingCheck::new(
                    instrument.id(),
                    instrument.market_quote(),
                    instrument.implied_quote(self)?,
                ))
            })
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(RepricingReport::new(checks))
    }

    // =========================================================================
    // Copies and perturbation
    // =========================================================================

    /// Copy of the curve under a new id.
    ///
    /// Points, instruments and base references are shared immutably. Asking
    /// for the curve's own id yields `<id>.Clone`.
    #[must_use]
    pub fn clone_as(&self, new_id: impl Into<String>) -> Curve {
        let mut id = new_id.into();
        if id == self.identifier.id {
            id.push_str(".Clone");
        }
        Curve {
            identifier: self.identifier.with_id(id),
            ..self.clone()
        }
    }

    /// A rebuilt copy with one instrument's quote shifted by `bp` basis
    /// points, id `<id>.Perturbed`. The curve itself is not changed.
    pub fn perturb(&self, instrument_id: &str, bp: f64) -> CurveResult<Curve> {
        let index = self.instrument_index(instrument_id)?;
        let mut curve = self.clone_as(format!("{}.Perturbed", self.identifier.id));
        curve.shift_quote(index, bp / 10_000.0);
        curve.build()?;
        Ok(curve)
    }

    /// One independently rebuilt curve per instrument, each with that
    /// instrument's quote shifted by `bp` basis points.
    ///
    /// Ids are `<id>.<instrument id>`. Spread curves also get one curve per
    /// base instrument, rebuilt over a shifted base, with ids
    /// `<id>.<base id>.<instrument id>`.
    pub fn risk_set(&self, bp: f64) -> CurveResult<Vec<Curve>> {
        self.state()?;
        let shift = bp / 10_000.0;
        let mut tasks: Vec<RiskTask> = (0..self.instruments.len()).map(RiskTask::Own).collect();
        if let Some(base) = self.kind.spread_base() {
            tasks.extend((0..base.instruments.len()).map(RiskTask::Base));
        }
        debug!(curve = %self.identifier.id, curves = tasks.len(), bp, "building risk set");

        #[cfg(feature = "parallel")]
        let curves: Vec<CurveResult<Curve>> = tasks
            .par_iter()
            .map(|task| self.risk_curve(*task, shift))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let curves: Vec<CurveResult<Curve>> = tasks
            .iter()
            .map(|task| self.risk_curve(*task, shift))
            .collect();

        curves.into_iter().collect()
    }

    fn risk_curve(&self, task: RiskTask, shift: f64) -> CurveResult<Curve> {
        match task {
            RiskTask::Own(index) => {
                let id = format!("{}.{}", self.identifier.id, self.instruments[index].id());
                let mut curve = self.clone_as(id);
                curve.shift_quote(index, shift);
                curve.build()?;
                Ok(curve)
            }
            RiskTask::Base(index) => {
                let base = self
                    .kind
                    .spread_base()
                    .ok_or_else(|| CurveError::invalid_config("curve has no base"))?;
                let suffix = format!("{}.{}", base.id(), base.instruments[index].id());
                let mut shifted_base = base.clone_as(suffix.clone());
                shifted_base.shift_quote(index, shift);
                shifted_base.build()?;

                let mut curve = self.clone_as(format!("{}.{}", self.identifier.id, suffix));
                curve.kind = self.kind.with_base(Arc::new(shifted_base));
                curve.stored = false;
                curve.build()?;
                Ok(curve)
            }
        }
    }

    fn instrument_index(&self, instrument_id: &str) -> CurveResult<usize> {
        self.instruments
            .iter()
            .position(|i| i.id() == instrument_id)
            .ok_or_else(|| {
                CurveError::invalid_instrument(
                    instrument_id,
                    format!("not a calibration instrument of {}", self.identifier.id),
                )
            })
    }

    /// Shifts one quote and marks the curve for recalibration.
    fn shift_quote(&mut self, index: usize, shift: f64) {
        if self.kind.spread_base().is_some() {
            self.spreads[index] += shift;
        } else {
            let instrument = &self.instruments[index];
            let bumped = instrument.with_market_quote(instrument.market_quote() + shift);
            self.instruments[index] = bumped;
        }
        self.stored = false;
        self.status = CurveStatus::AssetsBound;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Curve id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.identifier.id
    }

    /// Identity of the curve.
    #[must_use]
    pub fn identifier(&self) -> &CurveIdentifier {
        &self.identifier
    }

    /// Resolved configuration.
    #[must_use]
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Structure-specific behaviour.
    #[must_use]
    pub fn kind(&self) -> &CurveKind {
        &self.kind
    }

    /// Build progress.
    #[must_use]
    pub fn status(&self) -> CurveStatus {
        self.status
    }

    /// True when the curve can be queried.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == CurveStatus::Ready && self.state.is_some()
    }

    /// Bound instruments. Spread curve instruments carry no quote of their
    /// own; see [`Curve::spreads`].
    #[must_use]
    pub fn instruments(&self) -> &[Arc<dyn PriceableInstrument>] {
        &self.instruments
    }

    /// Quoted spreads, aligned with [`Curve::instruments`].
    #[must_use]
    pub fn spreads(&self) -> &[f64] {
        &self.spreads
    }
}

impl TermStructure for Curve {
    fn base_date(&self) -> Date {
        self.identifier.base_date
    }

    fn time_of(&self, date: Date) -> f64 {
        self.config.day_count.year_fraction(self.identifier.base_date, date)
    }

    fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        self.value(&Point::Time(t))
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        self.value(&Point::Date(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::StandardInstrumentFactory;
    use crate::term_curve::{CurvePoint, InterpolationMethod};
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn base_date() -> Date {
        Date::from_ymd(2024, 1, 1).unwrap()
    }

    fn identifier(id: &str, structure: StructureType) -> CurveIdentifier {
        CurveIdentifier::new(id, base_date(), "LogLinear", structure, "USD")
    }

    fn deposits() -> InstrumentSet {
        InstrumentSet::new()
            .with_market_quote("USD-Deposit-1M", dec!(0.05))
            .with_market_quote("USD-Deposit-3M", dec!(0.051))
            .with_market_quote("USD-Deposit-1Y", dec!(0.0525))
    }

    fn discount_curve() -> Curve {
        Curve::from_instruments(
            identifier("USD-OIS", StructureType::DiscountCurve),
            CurveConfig::default(),
            CurveKind::Discount,
            &deposits(),
            &StandardInstrumentFactory::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_lifecycle_states() {
        let mut curve = Curve::new(
            identifier("USD-OIS", StructureType::DiscountCurve),
            CurveConfig::default(),
            CurveKind::Discount,
        )
        .unwrap();
        assert_eq!(curve.status(), CurveStatus::Unbuilt);
        assert!(matches!(
            curve.value(&Point::Time(1.0)),
            Err(CurveError::CurveNotReady { .. })
        ));
        assert!(curve.build().unwrap_err().is_invalid_input());

        curve
            .bind_assets(&deposits(), &StandardInstrumentFactory::new())
            .unwrap();
        assert_eq!(curve.status(), CurveStatus::AssetsBound);

        let outcome = curve.build().unwrap();
        assert_eq!(outcome, BuildOutcome::Rebuilt { points: 4 });
        assert!(curve.is_ready());
    }

    #[test]
    fn test_kind_must_match_structure() {
        let err = Curve::new(
            identifier("USD-OIS", StructureType::FxCurve),
            CurveConfig::default(),
            CurveKind::Discount,
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::InvalidConfig { .. }));
    }

    #[test]
    fn test_invalid_set_keeps_previous_state() {
        let mut curve = discount_curve();
        let before = curve.term_curve().unwrap().clone();

        let err = curve
            .bind_assets(&InstrumentSet::new(), &StandardInstrumentFactory::new())
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(curve.term_curve().unwrap(), &before);
        assert_eq!(curve.instruments().len(), 3);
    }

    #[test]
    fn test_rate_queries() {
        let curve = discount_curve();
        let one_year = Date::from_ymd(2025, 1, 1).unwrap();

        let df = curve.discount_factor(one_year).unwrap();
        assert_relative_eq!(df, 1.0 / (1.0 + 0.0525 * 366.0 / 360.0), epsilon = 1e-14);

        let r = curve.zero_rate(one_year, Compounding::Continuous).unwrap();
        assert_relative_eq!(r, -df.ln() / (366.0 / 365.0), epsilon = 1e-14);
        assert!(matches!(
            curve.zero_rate(base_date(), Compounding::Continuous),
            Err(CurveError::ZeroYearFraction { .. })
        ));

        let three_months = Date::from_ymd(2024, 4, 1).unwrap();
        let fwd_df = curve.forward_discount_factor(three_months, one_year).unwrap();
        assert_relative_eq!(
            fwd_df,
            df / curve.discount_factor(three_months).unwrap(),
            epsilon = 1e-15
        );
        assert!(curve.forward_rate(three_months, one_year).unwrap() > 0.0);
        assert!(curve.forward(one_year).is_err());
    }

    #[test]
    fn test_clone_as_renames_and_shares_points() {
        let curve = discount_curve();
        let copy = curve.clone_as("USD-OIS");
        assert_eq!(copy.id(), "USD-OIS.Clone");
        assert_eq!(copy.term_curve().unwrap(), curve.term_curve().unwrap());

        let renamed = curve.clone_as("USD-OIS-EOD");
        assert_eq!(renamed.id(), "USD-OIS-EOD");
        assert_eq!(renamed.identifier().base_date, base_date());
    }

    #[test]
    fn test_perturb_leaves_original_alone() {
        let curve = discount_curve();
        let before = curve.term_curve().unwrap().clone();

        let bumped = curve.perturb("USD-Deposit-3M", 1.0).unwrap();
        assert_eq!(bumped.id(), "USD-OIS.Perturbed");
        assert_eq!(curve.term_curve().unwrap(), &before);

        let quotes = bumped.implied_quotes().unwrap();
        assert_relative_eq!(quotes[1].1, 0.0511, epsilon = 1e-12);
        assert!(curve.perturb("USD-Deposit-2Y", 1.0).is_err());
    }

    #[test]
    fn test_stored_points_skip_bootstrap() {
        let stored = discount_curve().term_curve().unwrap().clone();
        let factory = StandardInstrumentFactory::new();

        let mut curve = Curve::from_term_curve(
            identifier("USD-OIS", StructureType::DiscountCurve),
            CurveConfig::default(),
            CurveKind::Discount,
            stored.clone(),
        )
        .unwrap()
        .with_assets(&deposits(), &factory)
        .unwrap();
        assert!(curve.is_ready());
        assert_eq!(curve.build().unwrap(), BuildOutcome::NothingToDo);

        let mut forced = Curve::from_term_curve(
            identifier("USD-OIS", StructureType::DiscountCurve),
            CurveConfig::default().with_bootstrap_override(true),
            CurveKind::Discount,
            stored,
        )
        .unwrap()
        .with_assets(&deposits(), &factory)
        .unwrap();
        assert_eq!(forced.build().unwrap(), BuildOutcome::Rebuilt { points: 4 });

        let empty = TermCurve::new(Vec::new(), InterpolationMethod::LogLinear, true).unwrap();
        let unbuilt = Curve::from_term_curve(
            identifier("USD-OIS", StructureType::DiscountCurve),
            CurveConfig::default(),
            CurveKind::Discount,
            empty,
        )
        .unwrap();
        assert_eq!(unbuilt.status(), CurveStatus::Unbuilt);
    }

    #[test]
    fn test_closest_values_on_curve() {
        let curve = discount_curve();
        let (prev, next) = curve
            .closest_values(&Point::Date(Date::from_ymd(2024, 3, 1).unwrap()))
            .unwrap()
            .unwrap();
        assert_eq!(prev.date, Date::from_ymd(2024, 2, 1).unwrap());
        assert_eq!(next.date, Date::from_ymd(2024, 4, 1).unwrap());
        assert_eq!(
            curve.term_curve().unwrap().points()[1],
            CurvePoint::new(prev.date, prev.value)
        );
    }
}
