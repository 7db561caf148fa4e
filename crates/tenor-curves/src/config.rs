//! Curve identity and calibration configuration.
//!
//! A [`CurveConfig`] is resolved once from a [`CurveIdentifier`] through an
//! [`AlgorithmTable`] and then handed by value to the bootstrapper and the
//! interpolator. Tables can be loaded from TOML:
//!
//! ```toml
//! [[algorithm]]
//! structure = "DiscountCurve"
//! name = "Desk"
//! interpolation = "CubicZero"
//! tolerance = 1e-12
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::{Compounding, Date, Period, TimeUnit};
use tenor_math::extrapolation::ExtrapolationMethod;

use crate::error::{CurveError, CurveResult};
use crate::term_curve::InterpolationMethod;

// =============================================================================
// Identity
// =============================================================================

/// The kind of structure a curve represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    /// Discount factors from rate instruments
    DiscountCurve,
    /// Spread factors over a base discount curve
    RateSpreadCurve,
    /// Cross-currency spread factors over a base discount curve
    XccySpreadCurve,
    /// Outright FX forwards
    FxCurve,
    /// Volatility term structure
    VolatilityCurve,
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Externally supplied identity of a curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveIdentifier {
    /// Unique id, e.g. `USD-SOFR-3M`.
    pub id: String,
    /// Date at which the curve starts.
    pub base_date: Date,
    /// Algorithm name used to look up configuration.
    pub algorithm: String,
    /// Structure type.
    pub structure_type: StructureType,
    /// Currency (or currency pair for FX curves).
    pub currency: String,
}

impl CurveIdentifier {
    /// Creates an identifier.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        base_date: Date,
        algorithm: impl Into<String>,
        structure_type: StructureType,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            base_date,
            algorithm: algorithm.into(),
            structure_type,
            currency: currency.into(),
        }
    }

    /// Same identity under a different id.
    #[must_use]
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// What to do when an instrument matures on an already-solved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DuplicatePointPolicy {
    /// Keep the earlier point and ignore the instrument.
    Skip,
    /// Re-solve the point from the later instrument.
    #[default]
    Replace,
}

/// How an FX pair is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuoteBasis {
    /// Units of currency 1 per unit of currency 2.
    Currency1PerCurrency2,
    /// Units of currency 2 per unit of currency 1.
    #[default]
    Currency2PerCurrency1,
}

/// Immutable calibration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Interpolation scheme.
    pub interpolation: InterpolationMethod,
    /// Whether queries outside the calibrated range are answered.
    pub extrapolation_permitted: bool,
    /// Extrapolation style when permitted.
    pub extrapolation: ExtrapolationMethod,
    /// Repricing tolerance in quote units.
    pub tolerance: f64,
    /// Iteration cap for the root finder and for full-curve re-strip passes.
    pub max_iterations: u32,
    /// Day count of the interpolation time axis.
    pub day_count: DayCountConvention,
    /// Compounding for zero-rate interpolation.
    pub compounding: Compounding,
    /// Duplicate maturity handling.
    pub duplicate_policy: DuplicatePointPolicy,
    /// Drop basis swaps from spread inputs.
    pub strip_basis_swaps: bool,
    /// Re-bootstrap even when stored points are supplied.
    pub bootstrap_override: bool,
    /// Synthetic short-end horizon of cross-currency curves.
    pub cut_over: Period,
    /// FX quote convention for cross-currency curves.
    pub quote_basis: QuoteBasis,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::LogLinear,
            extrapolation_permitted: true,
            extrapolation: ExtrapolationMethod::Linear,
            tolerance: 1e-11,
            max_iterations: 100,
            day_count: DayCountConvention::Act365Fixed,
            compounding: Compounding::Continuous,
            duplicate_policy: DuplicatePointPolicy::Replace,
            strip_basis_swaps: false,
            bootstrap_override: false,
            cut_over: Period::new(1, TimeUnit::Years),
            quote_basis: QuoteBasis::Currency2PerCurrency1,
        }
    }
}

impl CurveConfig {
    /// Sets the interpolation scheme.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the extrapolation flag.
    #[must_use]
    pub fn with_extrapolation_permitted(mut self, permitted: bool) -> Self {
        self.extrapolation_permitted = permitted;
        self
    }

    /// Sets the repricing tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the cross-currency cut-over tenor.
    #[must_use]
    pub fn with_cut_over(mut self, cut_over: Period) -> Self {
        self.cut_over = cut_over;
        self
    }

    /// Sets the FX quote basis.
    #[must_use]
    pub fn with_quote_basis(mut self, quote_basis: QuoteBasis) -> Self {
        self.quote_basis = quote_basis;
        self
    }

    /// Enables basis swap stripping.
    #[must_use]
    pub fn with_strip_basis_swaps(mut self, strip: bool) -> Self {
        self.strip_basis_swaps = strip;
        self
    }

    /// Forces re-bootstrapping of stored curves.
    #[must_use]
    pub fn with_bootstrap_override(mut self, force: bool) -> Self {
        self.bootstrap_override = force;
        self
    }

    /// Checks settings that would make calibration meaningless.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(CurveError::invalid_config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(CurveError::invalid_config("max_iterations must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// Algorithm table
// =============================================================================

#[derive(Debug, Deserialize)]
struct AlgorithmFile {
    #[serde(default)]
    algorithm: Vec<AlgorithmEntry>,
}

#[derive(Debug, Deserialize)]
struct AlgorithmEntry {
    structure: StructureType,
    name: String,
    #[serde(flatten)]
    config: CurveConfig,
}

/// Configurations keyed by (structure type, algorithm name).
#[derive(Debug, Clone, Default)]
pub struct AlgorithmTable {
    entries: HashMap<(StructureType, String), CurveConfig>,
}

impl AlgorithmTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in algorithms.
    ///
    /// | Structure | Algorithm | Interpolation |
    /// |-----------|-----------|---------------|
    /// | DiscountCurve | `FastLinearZero` | LinearZero |
    /// | DiscountCurve | `LinearZero` | LinearZero |
    /// | DiscountCurve | `LogLinear` | LogLinear |
    /// | DiscountCurve | `CubicZero` | CubicZero |
    /// | RateSpreadCurve, XccySpreadCurve | `SpreadInterpolation` | Linear |
    /// | FxCurve | `Fx` | Linear |
    /// | VolatilityCurve | `Volatility` | LinearVariance |
    #[must_use]
    pub fn with_defaults() -> Self {
        let base = CurveConfig::default();
        let mut table = Self::empty();
        table.insert(
            StructureType::DiscountCurve,
            "FastLinearZero",
            base.clone()
                .with_interpolation(InterpolationMethod::LinearZero)
                .with_tolerance(1e-10),
        );
        for (name, method) in [
            ("LinearZero", InterpolationMethod::LinearZero),
            ("LogLinear", InterpolationMethod::LogLinear),
            ("CubicZero", InterpolationMethod::CubicZero),
        ] {
            table.insert(
                StructureType::DiscountCurve,
                name,
                base.clone().with_interpolation(method),
            );
        }
        for structure in [StructureType::RateSpreadCurve, StructureType::XccySpreadCurve] {
            table.insert(
                structure,
                "SpreadInterpolation",
                base.clone().with_interpolation(InterpolationMethod::Linear),
            );
        }
        table.insert(
            StructureType::FxCurve,
            "Fx",
            base.clone()
                .with_interpolation(InterpolationMethod::Linear)
                .with_tolerance(1e-10),
        );
        table.insert(
            StructureType::VolatilityCurve,
            "Volatility",
            CurveConfig {
                extrapolation: ExtrapolationMethod::Flat,
                ..base.with_interpolation(InterpolationMethod::LinearVariance)
            },
        );
        table
    }

    /// Parses a TOML table of `[[algorithm]]` entries.
    pub fn from_toml_str(text: &str) -> CurveResult<Self> {
        let file: AlgorithmFile =
            toml::from_str(text).map_err(|e| CurveError::invalid_config(e.to_string()))?;
        let mut table = Self::empty();
        for entry in file.algorithm {
            entry.config.validate()?;
            table.insert(entry.structure, entry.name, entry.config);
        }
        Ok(table)
    }

    /// Adds or replaces a configuration.
    pub fn insert(&mut self, structure: StructureType, name: impl Into<String>, config: CurveConfig) {
        self.entries.insert((structure, name.into()), config);
    }

    /// Adds every entry of `other`, replacing clashes.
    #[must_use]
    pub fn merged(mut self, other: AlgorithmTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Resolves the configuration for a curve.
    pub fn resolve(&self, identifier: &CurveIdentifier) -> CurveResult<CurveConfig> {
        let key = (identifier.structure_type, identifier.algorithm.clone());
        let config = self.entries.get(&key).cloned().ok_or_else(|| {
            CurveError::invalid_config(format!(
                "no algorithm '{}' for {}",
                identifier.algorithm, identifier.structure_type
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(structure: StructureType, algorithm: &str) -> CurveIdentifier {
        CurveIdentifier::new(
            "TEST",
            Date::from_ymd(2024, 1, 1).unwrap(),
            algorithm,
            structure,
            "USD",
        )
    }

    #[test]
    fn test_default_config() {
        let config = CurveConfig::default();
        assert!((config.tolerance - 1e-11).abs() < 1e-20);
        assert_eq!(config.day_count, DayCountConvention::Act365Fixed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_builtin() {
        let table = AlgorithmTable::with_defaults();
        let config = table
            .resolve(&identifier(StructureType::VolatilityCurve, "Volatility"))
            .unwrap();
        assert_eq!(config.interpolation, InterpolationMethod::LinearVariance);
        assert_eq!(config.extrapolation, ExtrapolationMethod::Flat);
    }

    #[test]
    fn test_resolve_unknown_algorithm() {
        let table = AlgorithmTable::with_defaults();
        let err = table
            .resolve(&identifier(StructureType::FxCurve, "Nope"))
            .unwrap_err();
        assert!(matches!(err, CurveError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_from_toml() {
        let text = r#"
            [[algorithm]]
            structure = "XccySpreadCurve"
            name = "Desk"
            interpolation = "Linear"
            cut_over = "6M"
            quote_basis = "Currency1PerCurrency2"
            extrapolation_permitted = false
        "#;
        let table = AlgorithmTable::from_toml_str(text).unwrap();
        let config = table
            .resolve(&identifier(StructureType::XccySpreadCurve, "Desk"))
            .unwrap();
        assert_eq!(config.cut_over, Period::new(6, TimeUnit::Months));
        assert_eq!(config.quote_basis, QuoteBasis::Currency1PerCurrency2);
        assert!(!config.extrapolation_permitted);
        assert!((config.tolerance - 1e-11).abs() < 1e-20);
    }

    #[test]
    fn test_toml_rejects_bad_tolerance() {
        let text = r#"
            [[algorithm]]
            structure = "DiscountCurve"
            name = "Broken"
            tolerance = -1.0
        "#;
        assert!(AlgorithmTable::from_toml_str(text).is_err());
    }

    #[test]
    fn test_merge_overrides_defaults() {
        let mut custom = AlgorithmTable::empty();
        custom.insert(
            StructureType::DiscountCurve,
            "LogLinear",
            CurveConfig::default().with_tolerance(1e-8),
        );
        let table = AlgorithmTable::with_defaults().merged(custom);
        let config = table
            .resolve(&identifier(StructureType::DiscountCurve, "LogLinear"))
            .unwrap();
        assert!((config.tolerance - 1e-8).abs() < 1e-20);
    }
}
