//! Result types for SPI computation.

use std::collections::BTreeMap;

use spi_calendar::YearMonth;

use crate::category::DroughtCategory;
use crate::fit::FittedDistribution;
use crate::region::RegionKey;

/// Identifies one fitting partition: region, accumulation scale and
/// calendar month.
///
/// Orders by region, then scale, then month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    region: RegionKey,
    scale: usize,
    month: u8,
}

impl PartitionKey {
    /// Creates a partition key. `month` is 1-indexed.
    pub fn new(region: RegionKey, scale: usize, month: u8) -> Self {
        Self {
            region,
            scale,
            month,
        }
    }

    /// Region key.
    pub fn region(&self) -> &RegionKey {
        &self.region
    }

    /// Accumulation scale in months.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Calendar month (1..=12).
    pub fn month(&self) -> u8 {
        self.month
    }
}

/// One SPI value.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiScore {
    region: RegionKey,
    period: YearMonth,
    scale: usize,
    accumulated: f64,
    spi: f64,
}

impl SpiScore {
    pub(crate) fn new(
        region: RegionKey,
        period: YearMonth,
        scale: usize,
        accumulated: f64,
        spi: f64,
    ) -> Self {
        Self {
            region,
            period,
            scale,
            accumulated,
            spi,
        }
    }

    /// Region key.
    pub fn region(&self) -> &RegionKey {
        &self.region
    }

    /// Year and month of the last month in the window.
    pub fn period(&self) -> YearMonth {
        self.period
    }

    /// Accumulation scale in months.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Precipitation summed over the window.
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// SPI value.
    pub fn spi(&self) -> f64 {
        self.spi
    }

    /// Drought/wetness class of [`SpiScore::spi`].
    pub fn category(&self) -> DroughtCategory {
        DroughtCategory::from_spi(self.spi)
    }

    fn sort_key(&self) -> (&RegionKey, usize, YearMonth) {
        (&self.region, self.scale, self.period)
    }
}

/// Bookkeeping for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Partitions with a zero-inflated gamma fit.
    pub n_fitted: usize,
    /// Partitions whose valid accumulations are all zero.
    pub n_degenerate: usize,
    /// Partitions with observations but no complete window.
    pub n_empty: usize,
    /// Partitions where the gamma routine produced no parameters.
    pub n_unfittable: usize,
    /// Observation rows whose window was incomplete, summed over scales.
    pub n_absent: usize,
}

impl RunStats {
    pub(crate) fn merge(&mut self, other: &RunStats) {
        self.n_fitted += other.n_fitted;
        self.n_degenerate += other.n_degenerate;
        self.n_empty += other.n_empty;
        self.n_unfittable += other.n_unfittable;
        self.n_absent += other.n_absent;
    }
}

/// The output of an SPI run.
///
/// Scores are sorted by region, scale, then year/month.
#[derive(Debug, Clone)]
pub struct SpiResult {
    scores: Vec<SpiScore>,
    fits: BTreeMap<PartitionKey, FittedDistribution>,
    stats: RunStats,
}

impl SpiResult {
    pub(crate) fn new(
        mut scores: Vec<SpiScore>,
        fits: BTreeMap<PartitionKey, FittedDistribution>,
        stats: RunStats,
    ) -> Self {
        scores.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self {
            scores,
            fits,
            stats,
        }
    }

    /// All SPI values.
    pub fn scores(&self) -> &[SpiScore] {
        &self.scores
    }

    /// Consumes `self` and returns the owned score vector.
    pub fn into_scores(self) -> Vec<SpiScore> {
        self.scores
    }

    /// Fitted distribution of every non-empty partition.
    pub fn fits(&self) -> &BTreeMap<PartitionKey, FittedDistribution> {
        &self.fits
    }

    /// Fitted distribution of one partition.
    pub fn fit_for(&self, key: &PartitionKey) -> Option<&FittedDistribution> {
        self.fits.get(key)
    }

    /// Run counters.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Scores of one region at one scale, chronologically.
    pub fn scores_for<'a>(
        &'a self,
        region: &'a RegionKey,
        scale: usize,
    ) -> impl Iterator<Item = &'a SpiScore> + 'a {
        self.scores
            .iter()
            .filter(move |s| s.region() == region && s.scale() == scale)
    }
}
