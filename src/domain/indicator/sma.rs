//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i]), recomputed per window.
//! Warmup: first (n-1) positions are NaN. A NaN inside a window makes that
//! window's mean NaN.

use super::mean;

pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "SMA period must be >= 1");

    let mut out = vec![f64::NAN; values.len()];
    for i in (period - 1)..values.len() {
        out[i] = mean(&values[i + 1 - period..=i]);
    }
    out
}
