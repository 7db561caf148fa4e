//! Repricing checks for calibrated curves.
//!
//! A calibrated curve has to give back the quotes it was built from. The
//! report lists, per calibration instrument, the target quote, the quote
//! implied by the curve and the absolute difference.

use std::fmt;

/// Repricing result for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Quote the curve was calibrated to.
    pub target: f64,
    /// Quote implied by the curve.
    pub implied: f64,
    /// `|implied - target|`
    pub error: f64,
}

impl RepricingCheck {
    /// Creates a check.
    #[must_use]
    pub fn new(instrument_id: impl Into<String>, target: f64, implied: f64) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            target,
            implied,
            error: (implied - target).abs(),
        }
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | target: {:.8} | implied: {:.8} | error: {:.2e}",
            self.instrument_id, self.target, self.implied, self.error
        )
    }
}

/// Repricing results for every calibration instrument of a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    max_error: f64,
}

impl RepricingReport {
    /// Builds a report from individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        let max_error = checks.iter().map(|c| c.error).fold(0.0, f64::max);
        Self { checks, max_error }
    }

    /// Individual checks, in calibration order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Largest absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// True when every instrument reprices within `tolerance`.
    #[must_use]
    pub fn passed(&self, tolerance: f64) -> bool {
        self.checks.iter().all(|c| c.error <= tolerance)
    }

    /// Checks whose error exceeds `tolerance`.
    #[must_use]
    pub fn failures(&self, tolerance: f64) -> Vec<&RepricingCheck> {
        self.checks.iter().filter(|c| c.error > tolerance).collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing: {} instruments, max error {:.2e}", self.checks.len(), self.max_error)?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}
