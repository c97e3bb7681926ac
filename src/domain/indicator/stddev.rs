//! Rolling standard deviation.
//!
//! Sample standard deviation (n-1 denominator) over each trailing window of n values.
//! Warmup: first (n-1) positions are NaN.

use super::sample_stddev;

pub fn rolling_stddev(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 2, "standard deviation period must be >= 2");

    let mut out = vec![f64::NAN; values.len()];
    for i in (period - 1)..values.len() {
        out[i] = sample_stddev(&values[i + 1 - period..=i]);
    }
    out
}
