//! Accumulate, fit and standardize across all regions and scales.

use std::collections::BTreeMap;

use rayon::prelude::*;
use spi_calendar::YearMonth;
use tracing::{debug, info, info_span, warn};

use crate::config::SpiConfig;
use crate::error::SpiError;
use crate::fit::{FittedDistribution, PartitionFit, fit_partition};
use crate::result::{PartitionKey, RunStats, SpiResult, SpiScore};
use crate::series::ObservationSeries;
use crate::transform::Standardizer;

/// Valid accumulations of one partition, in chronological order.
struct Partition {
    key: PartitionKey,
    periods: Vec<YearMonth>,
    values: Vec<f64>,
}

struct PartitionOutput {
    key: PartitionKey,
    fit: PartitionFit,
    scores: Vec<SpiScore>,
}

/// Splits every region's `scale`-month accumulations by calendar month.
///
/// Months that occur in a region but never receive a complete window are
/// counted in `n_empty` and produce no partition.
fn build_partitions(series: &ObservationSeries, scale: usize) -> (Vec<Partition>, RunStats) {
    let mut partitions = Vec::new();
    let mut stats = RunStats::default();

    for (region, region_series) in series.regions() {
        let accumulated = region_series.accumulate(scale);

        let mut seen = [false; 12];
        let mut by_month: [(Vec<YearMonth>, Vec<f64>); 12] = Default::default();

        for (&period, value) in accumulated.periods().iter().zip(accumulated.values()) {
            let m = (period.month() - 1) as usize;
            seen[m] = true;
            match value {
                Some(v) => {
                    by_month[m].0.push(period);
                    by_month[m].1.push(*v);
                }
                None => stats.n_absent += 1,
            }
        }

        for (m, (periods, values)) in by_month.into_iter().enumerate() {
            if values.is_empty() {
                if seen[m] {
                    stats.n_empty += 1;
                }
                continue;
            }
            partitions.push(Partition {
                key: PartitionKey::new(region.clone(), scale, (m + 1) as u8),
                periods,
                values,
            });
        }
    }

    (partitions, stats)
}

/// Fits one partition and, unless `fit_only`, scores its values in-sample.
fn process_partition(
    partition: &Partition,
    config: &SpiConfig,
    fit_only: bool,
) -> Result<PartitionOutput, SpiError> {
    let fit = fit_partition(&partition.values, config);

    let scores = match (&fit, fit_only) {
        (PartitionFit::Fitted(dist), false) => {
            let standardizer = Standardizer::new(dist, config.probability_bounds())?;
            partition
                .periods
                .iter()
                .zip(partition.values.iter())
                .map(|(&period, &x)| {
                    SpiScore::new(
                        partition.key.region().clone(),
                        period,
                        partition.key.scale(),
                        x,
                        standardizer.spi(x),
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    };

    Ok(PartitionOutput {
        key: partition.key.clone(),
        fit,
        scores,
    })
}

/// Runs every scale and merges partition outputs.
#[allow(clippy::type_complexity)]
fn run(
    series: &ObservationSeries,
    config: &SpiConfig,
    fit_only: bool,
) -> Result<(Vec<SpiScore>, BTreeMap<PartitionKey, FittedDistribution>, RunStats), SpiError> {
    config.validate()?;
    if series.is_empty() {
        return Err(SpiError::EmptyData);
    }

    let mut scores = Vec::new();
    let mut fits = BTreeMap::new();
    let mut stats = RunStats::default();

    for &scale in config.time_scales() {
        let _span = info_span!("scale", scale).entered();

        let (partitions, scale_stats) = build_partitions(series, scale);
        stats.merge(&scale_stats);

        let outputs: Vec<PartitionOutput> = if config.parallel() {
            partitions
                .par_iter()
                .map(|p| process_partition(p, config, fit_only))
                .collect::<Result<_, _>>()?
        } else {
            partitions
                .iter()
                .map(|p| process_partition(p, config, fit_only))
                .collect::<Result<_, _>>()?
        };

        for output in outputs {
            match output.fit {
                PartitionFit::Fitted(dist) => {
                    if dist.is_degenerate() {
                        debug!(
                            region = %output.key.region(),
                            month = output.key.month(),
                            n_valid = dist.n_valid(),
                            "degenerate partition: all accumulations are zero"
                        );
                        stats.n_degenerate += 1;
                    } else {
                        stats.n_fitted += 1;
                    }
                    fits.insert(output.key, dist);
                }
                PartitionFit::Unfittable => {
                    warn!(
                        region = %output.key.region(),
                        month = output.key.month(),
                        "gamma fit produced no parameters; partition skipped"
                    );
                    stats.n_unfittable += 1;
                }
                PartitionFit::Empty => stats.n_empty += 1,
            }
            scores.extend(output.scores);
        }

        debug!(n_partitions = partitions.len(), "scale complete");
    }

    Ok((scores, fits, stats))
}

/// Computes SPI values for every region and configured time scale.
///
/// Each (region, calendar month, scale) partition is fitted on all of its
/// years, including the values it then scores. Cells whose accumulation
/// window is incomplete are absent from the output. Partitions with no
/// positive accumulation score [`DEGENERATE_SPI`](crate::DEGENERATE_SPI).
///
/// # Errors
///
/// Returns [`SpiError::InvalidConfig`] for an invalid configuration and
/// [`SpiError::EmptyData`] if `series` has no rows.
pub fn compute_spi(series: &ObservationSeries, config: &SpiConfig) -> Result<SpiResult, SpiError> {
    info!(
        n_regions = series.n_regions(),
        n_rows = series.len(),
        scales = ?config.time_scales(),
        "computing SPI"
    );

    let (scores, fits, stats) = run(series, config, false)?;

    info!(
        n_scores = scores.len(),
        n_fitted = stats.n_fitted,
        n_degenerate = stats.n_degenerate,
        n_empty = stats.n_empty,
        "SPI complete"
    );

    Ok(SpiResult::new(scores, fits, stats))
}

/// Fits the reference distribution of every partition without scoring.
///
/// # Errors
///
/// Same conditions as [`compute_spi`].
pub fn fit_distributions(
    series: &ObservationSeries,
    config: &SpiConfig,
) -> Result<BTreeMap<PartitionKey, FittedDistribution>, SpiError> {
    let (_, fits, stats) = run(series, config, true)?;
    info!(
        n_fitted = stats.n_fitted,
        n_degenerate = stats.n_degenerate,
        "distributions fitted"
    );
    Ok(fits)
}
