//! Standardized Precipitation Index (SPI) from monthly precipitation.
//!
//! This crate turns monthly precipitation records of many regions into SPI
//! values at several accumulation time scales.
//!
//! # Pipeline
//!
//! 1. **Accumulate** trailing `w`-month sums per region (undefined until the
//!    window is full, or when it spans a missing or skipped month)
//! 2. **Fit** a zero-inflated gamma per (region, calendar month, scale):
//!    `q` = share of zero sums, gamma shape/scale by maximum likelihood on the
//!    positive sums
//! 3. **Standardize**: `p = q + (1 - q) * pgamma(x)` (or `q` at zero) →
//!    clamp → inverse standard normal CDF
//!
//! Partitions whose sums are all zero score [`DEGENERATE_SPI`] (−3.0).
//! Fits are in-sample: every year of a partition contributes to the
//! distribution that scores it.
//!
//! # Glossary
//!
//! - **Scale**: number of consecutive months summed before fitting
//! - **Partition**: all sums of one region, calendar month and scale
//! - **MLE**: maximum-likelihood estimation
//!
//! # Quick Start
//!
//! ```
//! use spi_index::{Observation, ObservationSeries, RegionKey, SpiConfig, compute_spi};
//!
//! let region = RegionKey::new("North", "Alpha", "101");
//! let mut rows = Vec::new();
//! for year in 2000..2010 {
//!     for month in 1..=12u8 {
//!         let value = ((year - 2000) as f64 + month as f64) * 3.0;
//!         rows.push(Observation::new(region.clone(), year, month, Some(value)).unwrap());
//!     }
//! }
//! let series = ObservationSeries::from_observations(rows).unwrap();
//!
//! let result = compute_spi(&series, &SpiConfig::new().with_time_scales([3])).unwrap();
//! assert_eq!(result.scores().len(), 120 - 2);
//! ```

mod accumulate;
mod category;
mod config;
mod error;
mod fit;
mod gamma;
mod pipeline;
mod region;
mod result;
mod series;
mod transform;

pub use accumulate::{AccumulatedSeries, accumulate};
pub use category::DroughtCategory;
pub use config::{ProbabilityBounds, SpiConfig};
pub use error::SpiError;
pub use fit::FittedDistribution;
pub use gamma::{GammaParams, MAX_SHAPE, fit_gamma_mle};
pub use pipeline::{compute_spi, fit_distributions};
pub use region::RegionKey;
pub use result::{PartitionKey, RunStats, SpiResult, SpiScore};
pub use series::{Observation, ObservationSeries, RegionSeries};
pub use transform::{DEGENERATE_SPI, Standardizer, standardize};

pub use spi_calendar::YearMonth;
