//! Technical indicator implementations.
//!
//! Every indicator maps an ordered `&[f64]` to a `Vec<f64>` of the same length,
//! position-aligned with the input. Positions without enough history hold
//! `f64::NAN`. Inputs that already start with NaN push the warm-up further out.
//!
//! - `IndicatorType`: indicator identity + parameters (usable as a HashMap key)
//! - `IndicatorType::compute`: evaluate the primary output over a run of bars

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sharpe;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod volatility;

pub use ema::{dema, ema, ema_seeded, tema};
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use sharpe::{daily_returns, rolling_sharpe};
pub use sma::sma;
pub use stddev::rolling_stddev;
pub use stochastic::{stochastic, stochastic_bars, Stochastic};
pub use volatility::{annualized_volatility, log_returns, Periodicity};

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::{extract_field, Field};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Dema(usize),
    Tema(usize),
    Stddev(usize),
    Rsi(usize),
    Sharpe(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        lookback: usize,
        k_period: usize,
        d_period: usize,
    },
}

impl IndicatorType {
    /// Evaluate the indicator's primary output over `bars`. Single-input
    /// indicators read `field`; MACD yields its line and the stochastic
    /// oscillator yields %K (it always reads high/low/close).
    pub fn compute(&self, bars: &[OhlcvBar], field: Field) -> Vec<f64> {
        match *self {
            IndicatorType::Stochastic {
                lookback,
                k_period,
                d_period,
            } => stochastic_bars(bars, lookback, k_period, d_period).k,
            _ => self.compute_values(&extract_field(bars, field)),
        }
    }

    /// Evaluate over a plain value sequence. The stochastic oscillator treats
    /// `values` as high, low and close at once.
    pub fn compute_values(&self, values: &[f64]) -> Vec<f64> {
        match *self {
            IndicatorType::Sma(period) => sma(values, period),
            IndicatorType::Ema(period) => ema(values, period),
            IndicatorType::Dema(period) => dema(values, period),
            IndicatorType::Tema(period) => tema(values, period),
            IndicatorType::Stddev(period) => rolling_stddev(values, period),
            IndicatorType::Rsi(period) => rsi(values, period),
            IndicatorType::Sharpe(period) => rolling_sharpe(values, period),
            IndicatorType::Macd { fast, slow, signal } => macd(values, fast, slow, signal).line,
            IndicatorType::Stochastic {
                lookback,
                k_period,
                d_period,
            } => stochastic(values, values, values, lookback, k_period, d_period).k,
        }
    }

    /// Length of the NaN prefix of the primary output for an input with no
    /// leading NaNs.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorType::Sma(p) | IndicatorType::Ema(p) | IndicatorType::Stddev(p) => {
                p.saturating_sub(1)
            }
            IndicatorType::Dema(p) => 2 * p.saturating_sub(1),
            IndicatorType::Tema(p) => 3 * p.saturating_sub(1),
            IndicatorType::Rsi(p) | IndicatorType::Sharpe(p) => p,
            IndicatorType::Macd { fast, slow, .. } => fast.max(slow).saturating_sub(1),
            IndicatorType::Stochastic { k_period, .. } => k_period.saturating_sub(1),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Dema(period) => write!(f, "DEMA({})", period),
            IndicatorType::Tema(period) => write!(f, "TEMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Sharpe(period) => write!(f, "SHARPE({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic {
                lookback,
                k_period,
                d_period,
            } => write!(f, "STOCHASTIC({},{},{})", lookback, k_period, d_period),
        }
    }
}

/// Arithmetic mean; NaN anywhere in `window` gives NaN.
pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample (n-1) standard deviation. Needs at least two values.
pub(crate) fn sample_stddev(window: &[f64]) -> f64 {
    let m = mean(window);
    let ss: f64 = window.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (window.len() - 1) as f64).sqrt()
}
