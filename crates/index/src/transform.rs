//! Zero-inflated gamma to standard normal transform.

use statrs::distribution::{ContinuousCDF, Gamma, Normal};

use crate::config::ProbabilityBounds;
use crate::error::SpiError;
use crate::fit::FittedDistribution;
use crate::gamma::gamma_dist;

/// SPI assigned to every value of a partition with no positive accumulation.
pub const DEGENERATE_SPI: f64 = -3.0;

/// Cumulative probability of `x` under a point mass `q` at zero plus a
/// gamma for positive values.
pub(crate) fn zero_inflated_cdf(x: f64, q: f64, gamma: &Gamma) -> f64 {
    if x == 0.0 {
        q
    } else {
        q + (1.0 - q) * gamma.cdf(x)
    }
}

/// Maps accumulated values of one partition onto SPI values.
///
/// Holds the statrs distributions so they are built once per partition.
#[derive(Debug, Clone)]
pub struct Standardizer {
    zero_probability: f64,
    gamma: Option<Gamma>,
    normal: Normal,
    bounds: ProbabilityBounds,
}

impl Standardizer {
    /// Builds the transform for a fitted partition.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidConfig`] for invalid bounds, or a
    /// construction error if statrs rejects the distribution parameters.
    pub fn new(fit: &FittedDistribution, bounds: ProbabilityBounds) -> Result<Self, SpiError> {
        bounds.validate()?;
        let gamma = fit.gamma().as_ref().map(gamma_dist).transpose()?;
        let normal = Normal::new(0.0, 1.0).map_err(|e| SpiError::NormalConstruction {
            message: e.to_string(),
        })?;
        Ok(Self {
            zero_probability: fit.zero_probability(),
            gamma,
            normal,
            bounds,
        })
    }

    /// Clamped cumulative probability of `x`, `None` for a degenerate
    /// partition.
    pub fn probability(&self, x: f64) -> Option<f64> {
        let gamma = self.gamma.as_ref()?;
        let p = zero_inflated_cdf(x, self.zero_probability, gamma);
        Some(self.bounds.clamp(p))
    }

    /// SPI value of accumulated precipitation `x`.
    pub fn spi(&self, x: f64) -> f64 {
        match self.probability(x) {
            Some(p) => self.normal.inverse_cdf(p),
            None => DEGENERATE_SPI,
        }
    }
}

/// SPI value of a single accumulated value under `fit`.
///
/// Convenience wrapper around [`Standardizer`]; prefer the latter when
/// scoring many values of the same partition.
pub fn standardize(
    x: f64,
    fit: &FittedDistribution,
    bounds: ProbabilityBounds,
) -> Result<f64, SpiError> {
    Ok(Standardizer::new(fit, bounds)?.spi(x))
}
