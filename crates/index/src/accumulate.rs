//! Trailing-window accumulation of monthly values.

use spi_calendar::YearMonth;

/// Trailing `window`-month sums for one region.
///
/// `values[t]` is `Some` only when the `window` rows ending at `t` are all
/// present and cover consecutive calendar months.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedSeries {
    scale: usize,
    periods: Vec<YearMonth>,
    values: Vec<Option<f64>>,
}

impl AccumulatedSeries {
    /// Accumulates `values` (aligned with sorted `periods`) over `window`
    /// months.
    pub(crate) fn new(periods: &[YearMonth], values: &[Option<f64>], window: usize) -> Self {
        Self {
            scale: window,
            periods: periods.to_vec(),
            values: accumulate(periods, values, window),
        }
    }

    /// Window length in months.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Year/months, aligned with [`AccumulatedSeries::values`].
    pub fn periods(&self) -> &[YearMonth] {
        &self.periods
    }

    /// Accumulated values, `None` where the window is incomplete.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterates `(period, sum)` for the defined cells only.
    pub fn defined(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.periods
            .iter()
            .zip(self.values.iter())
            .filter_map(|(&p, v)| v.map(|v| (p, v)))
    }
}

/// Trailing-window sums over a chronologically sorted monthly series.
///
/// A missing value, or a step whose month does not directly follow the
/// previous row's month, restarts the run of usable months. Each output is
/// the plain sum of the `window` inputs ending at that row, so results do not
/// depend on anything outside the window. A `window` of zero yields no
/// defined values.
pub fn accumulate(periods: &[YearMonth], values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    debug_assert_eq!(periods.len(), values.len());
    let n = periods.len().min(values.len());
    let mut out = vec![None; n];
    if window == 0 {
        return out;
    }

    let mut run = 0usize;
    for t in 0..n {
        if values[t].is_none() {
            run = 0;
            continue;
        }
        let contiguous = t > 0 && periods[t].is_successor_of(periods[t - 1]);
        run = if contiguous { run + 1 } else { 1 };

        if run >= window {
            let sum: f64 = values[t + 1 - window..=t].iter().flatten().sum();
            out[t] = Some(sum);
        }
    }
    out
}
