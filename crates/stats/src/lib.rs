//! Statistical helper functions for the SPI crates.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Mean of the natural logarithms of a slice. Returns 0.0 if empty.
///
/// Non-positive values produce `-inf`/NaN; callers pass strictly positive data.
pub fn mean_ln(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().map(|x| x.ln()).sum();
    sum / data.len() as f64
}

/// Log-mean gap `ln(mean(x)) - mean(ln x)`.
///
/// Non-negative for positive data (Jensen), zero iff all values are equal.
/// This is the sufficient statistic of the gamma shape likelihood.
pub fn log_mean_gap(data: &[f64]) -> f64 {
    mean(data).ln() - mean_ln(data)
}

/// Trigamma function ψ'(x) for `x > 0`.
///
/// Shifts `x` upward with the recurrence ψ'(x) = ψ'(x + 1) + 1/x² until
/// `x >= 6`, then applies the asymptotic expansion. Returns NaN for
/// non-positive or non-finite input.
pub fn trigamma(x: f64) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        return f64::NAN;
    }

    let mut x = x;
    let mut acc = 0.0;
    while x < 6.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    // 1/x + 1/(2x²) + 1/(6x³) - 1/(30x⁵) + 1/(42x⁷) - 1/(30x⁹)
    let series = inv
        + 0.5 * inv2
        + inv * inv2 * (1.0 / 6.0 - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 / 30.0)));
    acc + series
}
