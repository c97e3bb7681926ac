//! Stochastic oscillator.
//!
//! raw %K[i] = (C[i] - min(L, lookback)) / (max(H, lookback) - min(L, lookback)),
//! as a fraction in [0, 1]. The first (lookback - 1) raw values are 0, not NaN,
//! so the smoothing below warms up after k_period - 1 positions. A window
//! whose high equals its low also gives 0.
//!
//! %K = SMA(raw %K, k_period), %D = SMA(%K, d_period).

use super::sma;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn raw_k(high: &[f64], low: &[f64], close: &[f64], lookback: usize) -> Vec<f64> {
    assert!(lookback >= 1, "stochastic lookback must be >= 1");
    assert!(
        high.len() == close.len() && low.len() == close.len(),
        "high, low and close must be aligned"
    );

    let mut out = vec![0.0; close.len()];
    for i in (lookback - 1)..close.len() {
        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        for j in (i + 1 - lookback..=i).rev() {
            lowest = lowest.min(low[j]);
            highest = highest.max(high[j]);
        }
        let range = highest - lowest;
        out[i] = if range == 0.0 {
            0.0
        } else {
            (close[i] - lowest) / range
        };
    }
    out
}

pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    lookback: usize,
    k_period: usize,
    d_period: usize,
) -> Stochastic {
    let raw = raw_k(high, low, close, lookback);
    let k = sma(&raw, k_period);
    let d = sma(&k, d_period);
    Stochastic { k, d }
}

pub fn stochastic_bars(
    bars: &[OhlcvBar],
    lookback: usize,
    k_period: usize,
    d_period: usize,
) -> Stochastic {
    let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
    stochastic(&high, &low, &close, lookback, k_period, d_period)
}
