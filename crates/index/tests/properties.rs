//! Whole-pipeline properties on a synthetic multi-region dataset.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma};
use spi_index::{
    DEGENERATE_SPI, Observation, ObservationSeries, ProbabilityBounds, RegionKey, SpiConfig,
    YearMonth, compute_spi,
};
use statrs::distribution::{ContinuousCDF, Normal};

// ---------------------------------------------------------------------------
// Synthetic data
// ---------------------------------------------------------------------------

/// Three regions, 30 years, ~25% dry months and ~2% missing values.
/// Region "103" starts two years later and has a skipped month.
fn synthetic_series(seed: u64) -> ObservationSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let rain = Gamma::new(1.8, 25.0).unwrap();
    let mut rows = Vec::new();

    for (code, start) in [("101", 1990), ("102", 1990), ("103", 1992)] {
        let key = RegionKey::new("North", format!("Sub{code}"), code);
        for year in start..start + 30 {
            for month in 1..=12u8 {
                if code == "103" && year == 2000 && month == 4 {
                    continue;
                }
                let value = if rng.random_bool(0.02) {
                    None
                } else if rng.random_bool(0.25) {
                    Some(0.0)
                } else {
                    Some(rain.sample(&mut rng))
                };
                rows.push(Observation::new(key.clone(), year, month, value).unwrap());
            }
        }
    }
    ObservationSeries::from_observations(rows).unwrap()
}

fn sentinel_or_bounded(spi: f64, bounds: ProbabilityBounds) -> bool {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let lo = normal.inverse_cdf(bounds.lower());
    let hi = normal.inverse_cdf(bounds.upper());
    spi == DEGENERATE_SPI || (spi.is_finite() && spi >= lo - 1e-12 && spi <= hi + 1e-12)
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn repeated_runs_are_identical() {
    let series = synthetic_series(11);
    let config = SpiConfig::new();
    let a = compute_spi(&series, &config).unwrap();
    let b = compute_spi(&series, &config).unwrap();
    assert_eq!(a.scores(), b.scores());
    assert_eq!(a.fits(), b.fits());
}

#[test]
fn parallel_matches_sequential() {
    let series = synthetic_series(12);
    let par = compute_spi(&series, &SpiConfig::new().with_parallel(true)).unwrap();
    let seq = compute_spi(&series, &SpiConfig::new().with_parallel(false)).unwrap();
    assert_eq!(par.scores(), seq.scores());
    assert_eq!(par.fits(), seq.fits());
    assert_eq!(par.stats(), seq.stats());
}

// ---------------------------------------------------------------------------
// Range and monotonicity
// ---------------------------------------------------------------------------

#[test]
fn values_are_bounded_or_sentinel() {
    let series = synthetic_series(13);
    let config = SpiConfig::new().with_time_scales([1, 3, 6, 12]);
    let result = compute_spi(&series, &config).unwrap();
    assert!(!result.scores().is_empty());
    for s in result.scores() {
        assert!(
            sentinel_or_bounded(s.spi(), config.probability_bounds()),
            "{} {} scale {} spi {}",
            s.region(),
            s.period(),
            s.scale(),
            s.spi()
        );
    }
}

#[test]
fn monotone_within_partition() {
    let series = synthetic_series(14);
    let config = SpiConfig::new().with_time_scales([1, 3]);
    let result = compute_spi(&series, &config).unwrap();

    for key in result.fits().keys() {
        let mut pairs: Vec<(f64, f64)> = result
            .scores_for(key.region(), key.scale())
            .filter(|s| s.period().month() == key.month())
            .map(|s| (s.accumulated(), s.spi()))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            assert!(
                w[1].1 >= w[0].1,
                "{key:?}: spi({}) = {} < spi({}) = {}",
                w[1].0,
                w[1].1,
                w[0].0,
                w[0].1
            );
        }
    }
}

#[test]
fn zero_accumulations_share_one_value() {
    let series = synthetic_series(15);
    let config = SpiConfig::new().with_time_scales([1]);
    let result = compute_spi(&series, &config).unwrap();

    for (key, fit) in result.fits() {
        let zeros: BTreeSet<u64> = result
            .scores_for(key.region(), key.scale())
            .filter(|s| s.period().month() == key.month() && s.accumulated() == 0.0)
            .map(|s| s.spi().to_bits())
            .collect();
        assert!(zeros.len() <= 1, "{key:?}");
        if fit.is_degenerate() {
            assert!(zeros.iter().all(|&b| f64::from_bits(b) == DEGENERATE_SPI));
        }
    }
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Periods whose `scale` trailing rows are consecutive months with values.
fn complete_window_ends(
    periods: &[YearMonth],
    values: &[Option<f64>],
    scale: usize,
) -> BTreeSet<YearMonth> {
    let mut ends = BTreeSet::new();
    for end in 0..periods.len() {
        if end + 1 < scale {
            continue;
        }
        let start = end + 1 - scale;
        let contiguous = periods[end].ordinal() - periods[start].ordinal() == scale as i64 - 1;
        let present = values[start..=end].iter().all(Option::is_some);
        if contiguous && present {
            ends.insert(periods[end]);
        }
    }
    ends
}

#[test]
fn scores_exist_exactly_where_windows_are_complete() {
    let series = synthetic_series(16);
    for scale in [1, 6, 12] {
        let config = SpiConfig::new().with_time_scales([scale]);
        let result = compute_spi(&series, &config).unwrap();

        for (key, region_series) in series.regions() {
            let expected =
                complete_window_ends(region_series.periods(), region_series.values(), scale);
            let actual: BTreeSet<YearMonth> =
                result.scores_for(key, scale).map(|s| s.period()).collect();
            assert_eq!(actual, expected, "region {key} scale {scale}");
        }
    }
}

#[test]
fn skipped_month_breaks_windows() {
    let series = synthetic_series(16);
    let key = RegionKey::new("North", "Sub103", "103");
    let result = compute_spi(&series, &SpiConfig::new().with_time_scales([3])).unwrap();
    let periods: BTreeSet<YearMonth> = result.scores_for(&key, 3).map(|s| s.period()).collect();
    // April 2000 is absent, so windows ending in April, May and June 2000
    // all reach across the gap.
    for month in 4..=6 {
        assert!(!periods.contains(&YearMonth::new(2000, month).unwrap()));
    }
}

#[test]
fn accumulated_values_are_window_sums() {
    let series = synthetic_series(17);
    let scale = 3;
    let result = compute_spi(&series, &SpiConfig::new().with_time_scales([scale])).unwrap();

    for (key, region_series) in series.regions() {
        let periods = region_series.periods();
        let values = region_series.values();
        for s in result.scores_for(key, scale) {
            let end = periods.iter().position(|&p| p == s.period()).unwrap();
            let sum: f64 = values[end + 1 - scale..=end]
                .iter()
                .map(|v| v.unwrap())
                .sum();
            approx::assert_relative_eq!(s.accumulated(), sum, epsilon = 1e-9);
        }
    }
}

#[test]
fn every_score_has_a_fit() {
    let series = synthetic_series(18);
    let result = compute_spi(&series, &SpiConfig::new()).unwrap();
    for s in result.scores() {
        let key = spi_index::PartitionKey::new(s.region().clone(), s.scale(), s.period().month());
        let fit = result.fit_for(&key).unwrap();
        assert!(fit.n_valid() > 0);
    }
    let stats = result.stats();
    assert_eq!(stats.n_unfittable, 0);
    assert_eq!(stats.n_fitted + stats.n_degenerate, result.fits().len());
}

// ---------------------------------------------------------------------------
// Zero probability
// ---------------------------------------------------------------------------

#[test]
fn zero_probability_is_zero_share_of_every_partition() {
    let series = synthetic_series(19);
    let config = SpiConfig::new().with_time_scales([1, 3, 6]);
    let result = compute_spi(&series, &config).unwrap();
    assert!(!result.fits().is_empty());

    for (key, fit) in result.fits() {
        let sums: Vec<f64> = result
            .scores_for(key.region(), key.scale())
            .filter(|s| s.period().month() == key.month())
            .map(|s| s.accumulated())
            .collect();
        let n_valid = sums.len();
        let n_zero = sums.iter().filter(|&&x| x == 0.0).count();

        assert_eq!(fit.n_valid(), n_valid, "{key:?}");
        assert_eq!(
            fit.zero_probability(),
            n_zero as f64 / n_valid as f64,
            "{key:?}"
        );
        assert_eq!(fit.is_degenerate(), n_zero == n_valid, "{key:?}");
    }
}
