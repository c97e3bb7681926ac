//! Exponential Moving Average and its double/triple compositions.
//!
//! alpha = 2/(n+1), EMA[i] = EMA[i-1] + alpha * (x[i] - EMA[i-1]).
//!
//! Positions before the first non-NaN input (`nas`) stay NaN. Without an
//! explicit seed the first output is the mean of the first `n` values from
//! `nas`, placed at `nas + n - 1`. With a seed the first output is the seed
//! itself, at `nas`.

use super::mean;
use crate::domain::series::first_valid_index;

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    ema_from(values, period, None)
}

pub fn ema_seeded(values: &[f64], period: usize, seed: f64) -> Vec<f64> {
    ema_from(values, period, Some(seed))
}

fn ema_from(values: &[f64], period: usize, seed: Option<f64>) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");

    let n = values.len();
    let mut out = vec![f64::NAN; n];
    let nas = first_valid_index(values);
    if nas >= n {
        return out;
    }

    let (start, mut current) = match seed {
        Some(s) => (nas, s),
        None => {
            let start = nas + period - 1;
            if start >= n {
                return out;
            }
            (start, mean(&values[nas..=start]))
        }
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    out[start] = current;
    for i in (start + 1)..n {
        current += alpha * (values[i] - current);
        out[i] = current;
    }
    out
}

/// DEMA = 2*EMA - EMA(EMA)
pub fn dema(values: &[f64], period: usize) -> Vec<f64> {
    let e1 = ema(values, period);
    let e2 = ema(&e1, period);
    e1.iter().zip(&e2).map(|(a, b)| 2.0 * a - b).collect()
}

/// TEMA = 3*EMA - 3*EMA(EMA) + EMA(EMA(EMA))
pub fn tema(values: &[f64], period: usize) -> Vec<f64> {
    let e1 = ema(values, period);
    let e2 = ema(&e1, period);
    let e3 = ema(&e2, period);
    e1.iter()
        .zip(&e2)
        .zip(&e3)
        .map(|((a, b), c)| 3.0 * a - 3.0 * b + c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn ema_warmup() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(!out[2].is_nan());
        assert!(!out[3].is_nan());
        assert!(!out[4].is_nan());
    }

    #[test]
    fn ema_period_1() {
        let out = ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(out[2], 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert_relative_eq!(out[3], ema_3, epsilon = 1e-12);
        assert_relative_eq!(out[4], ema_4, epsilon = 1e-12);
    }

    #[test]
    fn ema_explicit_seed() {
        let out = ema_seeded(&[22.81, 23.09, 22.91], 9, 22.81);

        assert_abs_diff_eq!(out[0], 22.81, epsilon = 0.005);
        assert_abs_diff_eq!(out[1], 22.87, epsilon = 0.005);
        assert_abs_diff_eq!(out[2], 22.87, epsilon = 0.005);
    }

    #[test]
    fn ema_seeded_skips_leading_nan_only() {
        let out = ema_seeded(&[f64::NAN, f64::NAN, 5.0, 7.0], 3, 5.0);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 5.0);
        assert_relative_eq!(out[3], 6.0);
    }

    #[test]
    fn ema_leading_nan_shifts_seed() {
        let out = ema(&[f64::NAN, 10.0, 20.0, 30.0, 40.0], 3);
        assert!(out[..3].iter().all(|v| v.is_nan()));
        assert_relative_eq!(out[3], 20.0);
        assert_relative_eq!(out[4], 30.0);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema(&[100.0; 5], 3);
        for v in &out[2..] {
            assert_relative_eq!(*v, 100.0);
        }
    }

    #[test]
    fn ema_empty_and_all_nan() {
        assert!(ema(&[], 3).is_empty());
        let out = ema(&[f64::NAN, f64::NAN], 1);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_insufficient_history() {
        let out = ema(&[1.0, 2.0], 3);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    #[should_panic(expected = "EMA period must be >= 1")]
    fn ema_period_0_panics() {
        ema(&[1.0, 2.0], 0);
    }

    #[test]
    fn dema_warmup_and_constant_input() {
        let out = dema(&[50.0; 10], 3);
        assert_eq!(out.len(), 10);
        assert!(out[..4].iter().all(|v| v.is_nan()));
        for v in &out[4..] {
            assert_relative_eq!(*v, 50.0);
        }
    }

    #[test]
    fn dema_matches_composition() {
        let values: Vec<f64> = (1..=12).map(|i| (i * i) as f64).collect();
        let out = dema(&values, 3);
        let e1 = ema(&values, 3);
        let e2 = ema(&e1, 3);
        assert_relative_eq!(out[11], 2.0 * e1[11] - e2[11], epsilon = 1e-12);
    }

    #[test]
    fn tema_warmup_and_linear_tracking() {
        // TEMA has no lag on a linear trend once warmed up.
        let values: Vec<f64> = (0..30).map(|i| 10.0 + 2.0 * i as f64).collect();
        let out = tema(&values, 4);
        assert!(out[..9].iter().all(|v| v.is_nan()));
        assert!(!out[9].is_nan());
        assert_abs_diff_eq!(out[29], values[29], epsilon = 1e-6);
    }
}
