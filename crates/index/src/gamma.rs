//! Gamma distribution parameters, maximum-likelihood estimation and the
//! statrs bridge.

use spi_stats::{log_mean_gap, mean, trigamma};
use statrs::distribution::Gamma;
use statrs::function::gamma::digamma;

use crate::error::SpiError;

/// Upper limit on the estimated shape.
///
/// Reached when all positive values are equal (including a single value),
/// where the likelihood has no finite maximum. The fit is then a narrow
/// gamma centred on the sample mean.
pub const MAX_SHAPE: f64 = 1e4;

/// Validated parameters for a Gamma distribution (shape/scale convention,
/// location zero).
///
/// Both `shape` (k) and `scale` (theta) must be finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    shape: f64,
    scale: f64,
}

impl GammaParams {
    /// Create new gamma parameters after validating that both `shape` and
    /// `scale` are finite and strictly positive.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0 {
            Some(Self { shape, scale })
        } else {
            None
        }
    }

    /// Shape parameter (k).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter (theta).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Distribution mean (shape * scale).
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// Rate parameter (1 / scale), used by statrs which parameterises Gamma
    /// by (shape, rate) rather than (shape, scale).
    pub(crate) fn rate(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Build a [`statrs::distribution::Gamma`] from validated [`GammaParams`].
pub(crate) fn gamma_dist(params: &GammaParams) -> Result<Gamma, SpiError> {
    Gamma::new(params.shape(), params.rate()).map_err(|e| SpiError::GammaConstruction {
        shape: params.shape(),
        scale: params.scale(),
        message: e.to_string(),
    })
}

/// Thom's closed-form approximation of the gamma shape MLE.
fn thom_shape(gap: f64) -> f64 {
    (1.0 + (1.0 + 4.0 * gap / 3.0).sqrt()) / (4.0 * gap)
}

/// Fit a two-parameter Gamma (location zero) to strictly positive values by
/// maximum likelihood.
///
/// The shape solves `ln(k) - digamma(k) = ln(mean) - mean(ln x)`. Thom's
/// approximation seeds a Newton iteration that stops once the relative step
/// falls below `tolerance` or after `max_iterations` steps. The scale
/// follows as `mean / k`. The shape never exceeds [`MAX_SHAPE`].
///
/// Returns `None` if `values` is empty or contains a non-positive or
/// non-finite value.
pub fn fit_gamma_mle(values: &[f64], max_iterations: usize, tolerance: f64) -> Option<GammaParams> {
    if values.is_empty() || values.iter().any(|&x| !x.is_finite() || x <= 0.0) {
        return None;
    }

    let mean = mean(values);
    let gap = log_mean_gap(values);

    let mut shape = if gap > 0.0 { thom_shape(gap) } else { MAX_SHAPE };

    if shape < MAX_SHAPE {
        for _ in 0..max_iterations {
            let f = shape.ln() - digamma(shape) - gap;
            let df = 1.0 / shape - trigamma(shape);
            if !f.is_finite() || !df.is_finite() || df == 0.0 {
                break;
            }
            let mut next = shape - f / df;
            if next <= 0.0 {
                next = shape / 2.0;
            }
            let converged = (next - shape).abs() <= tolerance * shape;
            shape = next;
            if converged || shape >= MAX_SHAPE {
                break;
            }
        }
    }

    let shape = shape.min(MAX_SHAPE);
    GammaParams::new(shape, mean / shape)
}
