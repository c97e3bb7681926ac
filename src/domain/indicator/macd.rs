//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: line is valid from max(fast, slow) - 1, signal line from
//! max(fast, slow) - 1 + signal - 1.

use super::ema;
use crate::domain::signal::MacdPoint;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub fast: Vec<f64>,
    pub slow: Vec<f64>,
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    /// Aligned (fast, slow, signal) tuples for the crossover classifier.
    pub fn points(&self) -> Vec<MacdPoint> {
        self.fast
            .iter()
            .zip(&self.slow)
            .zip(&self.signal)
            .map(|((&fast, &slow), &signal)| MacdPoint { fast, slow, signal })
            .collect()
    }
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Macd {
        fast: fast_ema,
        slow: slow_ema,
        line,
        signal,
        histogram,
    }
}
