//! Configuration for SPI computation.

use crate::error::SpiError;

/// Closed interval that cumulative probabilities are clamped into before the
/// inverse normal step.
///
/// Both bounds must lie strictly inside (0, 1) with `lower < upper`, so that
/// the inverse normal CDF never sees exactly 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityBounds {
    lower: f64,
    upper: f64,
}

impl ProbabilityBounds {
    /// Creates bounds without validation; see [`ProbabilityBounds::validate`].
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Clamps `p` into `[lower, upper]`.
    ///
    /// Bounds must have passed [`ProbabilityBounds::validate`].
    pub fn clamp(&self, p: f64) -> f64 {
        p.clamp(self.lower, self.upper)
    }

    /// Checks `0 < lower < upper < 1` with both bounds finite.
    pub fn validate(&self) -> Result<(), SpiError> {
        let ok = self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower > 0.0
            && self.upper < 1.0
            && self.lower < self.upper;
        if !ok {
            return Err(SpiError::InvalidConfig {
                reason: format!(
                    "probability bounds must satisfy 0 < lower < upper < 1, got [{}, {}]",
                    self.lower, self.upper
                ),
            });
        }
        Ok(())
    }
}

impl Default for ProbabilityBounds {
    fn default() -> Self {
        Self::new(0.0001, 0.9999)
    }
}

/// Configuration for SPI computation.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use spi_index::{ProbabilityBounds, SpiConfig};
///
/// let config = SpiConfig::new()
///     .with_time_scales([1, 3, 6, 12, 24])
///     .with_probability_bounds(ProbabilityBounds::new(0.001, 0.999));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct SpiConfig {
    time_scales: Vec<usize>,
    probability_bounds: ProbabilityBounds,
    parallel: bool,
    max_iterations: usize,
    tolerance: f64,
}

impl SpiConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `time_scales = [3, 6, 12]`,
    /// `probability_bounds = [0.0001, 0.9999]`, `parallel = true`,
    /// `max_iterations = 100`, `tolerance = 1e-10`.
    pub fn new() -> Self {
        Self {
            time_scales: vec![3, 6, 12],
            probability_bounds: ProbabilityBounds::default(),
            parallel: true,
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }

    // --- Builder methods ---

    /// Sets the accumulation time scales (months). Stored sorted and
    /// deduplicated.
    pub fn with_time_scales(mut self, scales: impl IntoIterator<Item = usize>) -> Self {
        let mut scales: Vec<usize> = scales.into_iter().collect();
        scales.sort_unstable();
        scales.dedup();
        self.time_scales = scales;
        self
    }

    /// Sets the probability clamp bounds.
    pub fn with_probability_bounds(mut self, bounds: ProbabilityBounds) -> Self {
        self.probability_bounds = bounds;
        self
    }

    /// Sets whether partitions are processed on the rayon thread pool.
    pub fn with_parallel(mut self, b: bool) -> Self {
        self.parallel = b;
        self
    }

    /// Sets the Newton iteration limit for the gamma shape estimate.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the relative convergence tolerance for the gamma shape estimate.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    // --- Accessors ---

    /// Returns the accumulation time scales, ascending.
    pub fn time_scales(&self) -> &[usize] {
        &self.time_scales
    }

    /// Returns the probability clamp bounds.
    pub fn probability_bounds(&self) -> ProbabilityBounds {
        self.probability_bounds
    }

    /// Returns whether partitions are processed in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the Newton iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the relative convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validates this configuration.
    ///
    /// Checks that at least one time scale is given and none is zero, that
    /// the probability bounds are valid, that `max_iterations` is at least 1
    /// and that `tolerance` is finite and positive.
    pub fn validate(&self) -> Result<(), SpiError> {
        if self.time_scales.is_empty() {
            return Err(SpiError::InvalidConfig {
                reason: "time_scales must not be empty".to_string(),
            });
        }

        if self.time_scales.contains(&0) {
            return Err(SpiError::InvalidConfig {
                reason: "time_scales must all be >= 1".to_string(),
            });
        }

        self.probability_bounds.validate()?;

        if self.max_iterations < 1 {
            return Err(SpiError::InvalidConfig {
                reason: format!("max_iterations must be >= 1, got {}", self.max_iterations),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SpiError::InvalidConfig {
                reason: format!("tolerance must be finite and > 0, got {}", self.tolerance),
            });
        }

        Ok(())
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SpiConfig::new();
        assert_eq!(cfg.time_scales(), &[3, 6, 12]);
        assert!((cfg.probability_bounds().lower() - 0.0001).abs() < f64::EPSILON);
        assert!((cfg.probability_bounds().upper() - 0.9999).abs() < f64::EPSILON);
        assert!(cfg.parallel());
        assert_eq!(cfg.max_iterations(), 100);
        assert!((cfg.tolerance() - 1e-10).abs() < f64::EPSILON);
    }

    #[test]
    fn builder_chaining() {
        let cfg = SpiConfig::new()
            .with_time_scales([12, 1, 3, 3])
            .with_probability_bounds(ProbabilityBounds::new(0.01, 0.99))
            .with_parallel(false)
            .with_max_iterations(20)
            .with_tolerance(1e-8);

        assert_eq!(cfg.time_scales(), &[1, 3, 12]);
        assert!((cfg.probability_bounds().lower() - 0.01).abs() < f64::EPSILON);
        assert!(!cfg.parallel());
        assert_eq!(cfg.max_iterations(), 20);
        assert!((cfg.tolerance() - 1e-8).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_ok() {
        assert!(SpiConfig::new().validate().is_ok());
    }

    #[test]
    fn validate_empty_scales() {
        let cfg = SpiConfig::new().with_time_scales(Vec::new());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_zero_scale() {
        let cfg = SpiConfig::new().with_time_scales([0, 3]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_bad_bounds() {
        for (lo, hi) in [
            (0.0, 0.9999),
            (0.0001, 1.0),
            (0.6, 0.4),
            (0.5, 0.5),
            (f64::NAN, 0.9),
        ] {
            let cfg = SpiConfig::new().with_probability_bounds(ProbabilityBounds::new(lo, hi));
            assert!(cfg.validate().is_err(), "bounds [{lo}, {hi}] should be rejected");
        }
    }

    #[test]
    fn validate_bad_iterations_and_tolerance() {
        assert!(SpiConfig::new().with_max_iterations(0).validate().is_err());
        assert!(SpiConfig::new().with_tolerance(0.0).validate().is_err());
        assert!(SpiConfig::new().with_tolerance(f64::NAN).validate().is_err());
    }

    #[test]
    fn clamp_bounds() {
        let b = ProbabilityBounds::default();
        assert_eq!(b.clamp(0.0), 0.0001);
        assert_eq!(b.clamp(1.0), 0.9999);
        assert_eq!(b.clamp(0.5), 0.5);
    }
}
