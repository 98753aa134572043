//! Monthly observation series grouped by region.

use std::collections::BTreeMap;

use spi_calendar::YearMonth;

use crate::accumulate::AccumulatedSeries;
use crate::error::SpiError;
use crate::region::RegionKey;

/// A single monthly precipitation observation.
///
/// `value` is `None` when the month is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    region: RegionKey,
    period: YearMonth,
    value: Option<f64>,
}

impl Observation {
    /// Creates a validated observation.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidMonth`] if `month` is outside 1..=12, or
    /// [`SpiError::InvalidValue`] if a present value is negative or not
    /// finite.
    pub fn new(
        region: RegionKey,
        year: i32,
        month: u8,
        value: Option<f64>,
    ) -> Result<Self, SpiError> {
        let period = YearMonth::new(year, month).map_err(|_| SpiError::InvalidMonth { month })?;
        if let Some(v) = value.filter(|v| !v.is_finite() || *v < 0.0) {
            return Err(SpiError::InvalidValue {
                region: region.to_string(),
                period: period.to_string(),
                value: v,
            });
        }
        Ok(Self {
            region,
            period,
            value,
        })
    }

    /// Region key.
    pub fn region(&self) -> &RegionKey {
        &self.region
    }

    /// Year and month.
    pub fn period(&self) -> YearMonth {
        self.period
    }

    /// Precipitation value, `None` if missing.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// The chronologically sorted months of one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSeries {
    periods: Vec<YearMonth>,
    values: Vec<Option<f64>>,
}

impl RegionSeries {
    /// Sorted year/months. Not necessarily contiguous.
    pub fn periods(&self) -> &[YearMonth] {
        &self.periods
    }

    /// Values aligned with [`RegionSeries::periods`].
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns `true` if the region has no rows.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Trailing `window`-month sums of this region.
    pub fn accumulate(&self, window: usize) -> AccumulatedSeries {
        AccumulatedSeries::new(&self.periods, &self.values, window)
    }
}

/// Monthly observations for many regions.
///
/// Rows are grouped by [`RegionKey`] and sorted chronologically within each
/// region, whatever order they were supplied in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries {
    regions: BTreeMap<RegionKey, RegionSeries>,
    n_rows: usize,
}

impl ObservationSeries {
    /// Groups and sorts observations.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::DuplicateObservation`] if a region has two rows
    /// for the same year and month.
    pub fn from_observations<I>(observations: I) -> Result<Self, SpiError>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut grouped: BTreeMap<RegionKey, Vec<(YearMonth, Option<f64>)>> = BTreeMap::new();
        let mut n_rows = 0usize;
        for obs in observations {
            grouped
                .entry(obs.region)
                .or_default()
                .push((obs.period, obs.value));
            n_rows += 1;
        }

        let mut regions = BTreeMap::new();
        for (region, mut rows) in grouped {
            rows.sort_by_key(|&(period, _)| period);
            if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(SpiError::DuplicateObservation {
                    region: region.to_string(),
                    period: w[0].0.to_string(),
                });
            }
            let (periods, values) = rows.into_iter().unzip();
            regions.insert(region, RegionSeries { periods, values });
        }

        Ok(Self { regions, n_rows })
    }

    /// Total number of rows across all regions.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Number of distinct regions.
    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    /// Series for one region.
    pub fn get(&self, region: &RegionKey) -> Option<&RegionSeries> {
        self.regions.get(region)
    }

    /// Iterates regions in key order.
    pub fn regions(&self) -> impl Iterator<Item = (&RegionKey, &RegionSeries)> {
        self.regions.iter()
    }
}
