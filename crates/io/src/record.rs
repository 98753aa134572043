//! Flat output rows shared by the CSV and Parquet writers.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use spi_index::{FittedDistribution, PartitionKey, SpiScore, YearMonth};

use crate::error::IoError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Score table header, also used when there are no rows to serialize.
pub(crate) const SCORE_COLUMNS: [&str; 9] = [
    "district",
    "sub_district",
    "sub_district_code",
    "date",
    "year",
    "month",
    "scale",
    "spi",
    "category",
];

/// Fit table header.
pub(crate) const FIT_COLUMNS: [&str; 10] = [
    "district",
    "sub_district",
    "sub_district_code",
    "month",
    "scale",
    "kind",
    "q",
    "shape",
    "scale_param",
    "n",
];

/// First day of the month of `period`.
pub(crate) fn month_start(period: YearMonth) -> Result<NaiveDate, IoError> {
    NaiveDate::from_ymd_opt(period.year(), u32::from(period.month()), 1).ok_or(
        IoError::InvalidDate {
            year: period.year(),
            month: period.month(),
        },
    )
}

/// Days since 1970-01-01, the Arrow `Date32` representation.
pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// One row of the score table.
#[derive(Debug, Serialize)]
pub(crate) struct ScoreRecord<'a> {
    pub district: &'a str,
    pub sub_district: &'a str,
    pub sub_district_code: &'a str,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u8,
    pub scale: usize,
    pub spi: f64,
    pub category: &'static str,
}

impl<'a> ScoreRecord<'a> {
    pub(crate) fn from_score(score: &'a SpiScore) -> Result<Self, IoError> {
        let region = score.region();
        let period = score.period();
        Ok(Self {
            district: region.district(),
            sub_district: region.sub_district(),
            sub_district_code: region.code(),
            date: month_start(period)?,
            year: period.year(),
            month: period.month(),
            scale: score.scale(),
            spi: score.spi(),
            category: score.category().label(),
        })
    }
}

/// One row of the fitted-parameter table.
///
/// `shape` and `scale_param` are empty for degenerate partitions.
#[derive(Debug, Serialize)]
pub(crate) struct FitRecord<'a> {
    pub district: &'a str,
    pub sub_district: &'a str,
    pub sub_district_code: &'a str,
    pub month: u8,
    pub scale: usize,
    pub kind: &'static str,
    pub q: f64,
    pub shape: Option<f64>,
    pub scale_param: Option<f64>,
    pub n: usize,
}

impl<'a> FitRecord<'a> {
    pub(crate) fn new(key: &'a PartitionKey, fit: &FittedDistribution) -> Self {
        let region = key.region();
        let gamma = fit.gamma();
        Self {
            district: region.district(),
            sub_district: region.sub_district(),
            sub_district_code: region.code(),
            month: key.month(),
            scale: key.scale(),
            kind: if fit.is_degenerate() {
                "degenerate"
            } else {
                "gamma"
            },
            q: fit.zero_probability(),
            shape: gamma.map(|g| g.shape()),
            scale_param: gamma.map(|g| g.scale()),
            n: fit.n_valid(),
        }
    }
}
