//! Rolling Sharpe-like ratio: mean(daily returns) / stddev(daily returns)
//! over each trailing window of n returns.
//!
//! Returns are taken first (r[t] = P[t]/P[t-1] - 1, undefined at t = 0) and
//! then windowed. The NaN prefix is therefore n long for a fully valid series,
//! one more than the n-1 prefix of the price-window indicators (SMA, stddev).
//! Callers aligning outputs on warm-up should use `IndicatorType::Sharpe(n).warmup()`.
//! A window with zero deviation yields 0.

use super::{mean, sample_stddev};

pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(prices.windows(2).map(|w| w[1] / w[0] - 1.0));
    out
}

pub fn rolling_sharpe(prices: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 2, "Sharpe period must be >= 2");

    let returns = daily_returns(prices);
    let mut out = vec![f64::NAN; prices.len()];
    for i in (period - 1)..returns.len() {
        let window = &returns[i + 1 - period..=i];
        if window.iter().any(|r| r.is_nan()) {
            continue;
        }
        let sd = sample_stddev(window);
        out[i] = if sd == 0.0 { 0.0 } else { mean(window) / sd };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn daily_returns_front_padded() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 3);
        assert!(r[0].is_nan());
        assert_relative_eq!(r[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[2], -0.1, epsilon = 1e-12);
        assert!(daily_returns(&[]).is_empty());
    }

    #[test]
    fn sharpe_warmup_is_period() {
        let prices = [100.0, 101.0, 103.0, 102.0, 105.0, 104.0];
        let out = rolling_sharpe(&prices, 3);
        assert_eq!(out.len(), prices.len());
        assert!(out[..3].iter().all(|v| v.is_nan()));
        assert!(out[3..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn sharpe_windows_returns_not_prices() {
        let prices = [100.0, 101.0, 103.0, 102.0];
        let out = rolling_sharpe(&prices, 3);

        let r = [0.01, 103.0 / 101.0 - 1.0, 102.0 / 103.0 - 1.0];
        let expected = mean(&r) / sample_stddev(&r);
        assert_relative_eq!(out[3], expected, epsilon = 1e-12);
    }

    #[test]
    fn sharpe_zero_deviation_is_zero() {
        let out = rolling_sharpe(&[10.0; 6], 3);
        for v in &out[3..] {
            assert_relative_eq!(*v, 0.0);
        }
    }
}
