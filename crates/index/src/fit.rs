//! Zero-inflated gamma fitting for one partition.

use crate::config::SpiConfig;
use crate::gamma::{GammaParams, fit_gamma_mle};

/// Reference distribution of one (region, calendar month, time scale)
/// partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FittedDistribution {
    /// Point mass `zero_probability` at zero plus a gamma for positive sums.
    ZeroInflatedGamma {
        /// Fraction of valid accumulations that are exactly zero.
        zero_probability: f64,
        /// Gamma fitted to the strictly positive accumulations.
        gamma: GammaParams,
        /// Number of valid accumulations in the partition.
        n_valid: usize,
    },
    /// Every valid accumulation is zero; no gamma exists.
    Degenerate {
        /// Number of valid accumulations in the partition.
        n_valid: usize,
    },
}

impl FittedDistribution {
    /// Probability of an exactly-zero accumulation (`q`).
    pub fn zero_probability(&self) -> f64 {
        match self {
            Self::ZeroInflatedGamma {
                zero_probability, ..
            } => *zero_probability,
            Self::Degenerate { .. } => 1.0,
        }
    }

    /// Gamma parameters, `None` for a degenerate partition.
    pub fn gamma(&self) -> Option<GammaParams> {
        match self {
            Self::ZeroInflatedGamma { gamma, .. } => Some(*gamma),
            Self::Degenerate { .. } => None,
        }
    }

    /// Number of valid accumulations the fit was estimated from.
    pub fn n_valid(&self) -> usize {
        match self {
            Self::ZeroInflatedGamma { n_valid, .. } | Self::Degenerate { n_valid } => *n_valid,
        }
    }

    /// Returns `true` if the partition had no positive accumulation.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate { .. })
    }
}

/// Outcome of fitting one partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PartitionFit {
    /// A usable distribution (possibly degenerate).
    Fitted(FittedDistribution),
    /// No valid accumulation at all.
    Empty,
    /// Positive values were present but the gamma routine returned nothing.
    Unfittable,
}

/// Fit the zero-inflated gamma of one partition from its valid
/// accumulations.
pub(crate) fn fit_partition(values: &[f64], config: &SpiConfig) -> PartitionFit {
    let n_valid = values.len();
    if n_valid == 0 {
        return PartitionFit::Empty;
    }

    let positive: Vec<f64> = values.iter().copied().filter(|&x| x > 0.0).collect();
    if positive.is_empty() {
        return PartitionFit::Fitted(FittedDistribution::Degenerate { n_valid });
    }

    let n_zero = values.iter().filter(|&&x| x == 0.0).count();
    let zero_probability = n_zero as f64 / n_valid as f64;

    match fit_gamma_mle(&positive, config.max_iterations(), config.tolerance()) {
        Some(gamma) => PartitionFit::Fitted(FittedDistribution::ZeroInflatedGamma {
            zero_probability,
            gamma,
            n_valid,
        }),
        None => PartitionFit::Unfittable,
    }
}
