//! RSI (Relative Strength Index), Wilder's method.
//!
//! - Changes: D[i] = x[i] - x[i-1], undefined at the first valid input
//! - Seed: mean gain / mean loss over the first n changes after `nas`
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first `nas + n` positions are NaN.

use crate::domain::series::first_valid_index;

pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "RSI period must be >= 1");

    let n = values.len();
    let mut out = vec![f64::NAN; n];
    let nas = first_valid_index(values);
    let first = nas + period;
    if first >= n {
        return out;
    }

    let p = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in (nas + 1)..=first {
        let (gain, loss) = split_change(values[i] - values[i - 1]);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= p;
    avg_loss /= p;
    out[first] = rsi_value(avg_gain, avg_loss);

    for i in (first + 1)..n {
        let (gain, loss) = split_change(values[i] - values[i - 1]);
        avg_gain = ((p - 1.0) * avg_gain + gain) / p;
        avg_loss = ((p - 1.0) * avg_loss + loss) / p;
        out[i] = rsi_value(avg_gain, avg_loss);
    }

    out
}

/// (gain, loss) magnitudes of one change. NaN stays NaN on both sides.
fn split_change(change: f64) -> (f64, f64) {
    if change.is_nan() {
        (f64::NAN, f64::NAN)
    } else if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
