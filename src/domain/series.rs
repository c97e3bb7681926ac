//! Time-series adapter: turns a run of bars into the plain `f64` sequences the
//! indicator engine works on.
//!
//! Field selection happens once here. Every indicator downstream only sees
//! `&[f64]`, with `f64::NAN` marking positions where a value is unavailable.

use crate::domain::error::TradestatError;
use crate::domain::ohlcv::OhlcvBar;
use std::fmt;
use std::str::FromStr;

/// Named numeric field of a bar, used where the selector comes from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
    Typical,
}

impl Field {
    pub fn select(self, bar: &OhlcvBar) -> f64 {
        match self {
            Field::Open => bar.open,
            Field::High => bar.high,
            Field::Low => bar.low,
            Field::Close => bar.close,
            Field::Volume => bar.volume as f64,
            Field::Typical => bar.typical_price(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
            Field::Typical => "typical",
        };
        f.write_str(name)
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Field::Open),
            "high" => Ok(Field::High),
            "low" => Ok(Field::Low),
            "close" => Ok(Field::Close),
            "volume" => Ok(Field::Volume),
            "typical" => Ok(Field::Typical),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// Project each bar through `selector`, preserving order and length.
pub fn extract<F>(bars: &[OhlcvBar], selector: F) -> Vec<f64>
where
    F: Fn(&OhlcvBar) -> f64,
{
    bars.iter().map(selector).collect()
}

pub fn extract_field(bars: &[OhlcvBar], field: Field) -> Vec<f64> {
    extract(bars, |b| field.select(b))
}

/// Index of the first non-NaN value, or `values.len()` if there is none.
pub fn first_valid_index(values: &[f64]) -> usize {
    values
        .iter()
        .position(|v| !v.is_nan())
        .unwrap_or(values.len())
}

/// Number of NaN values before the first valid one.
pub fn leading_nan_count(values: &[f64]) -> usize {
    first_valid_index(values)
}

/// Check that dates strictly increase. Indicators assume this and do not
/// re-check it.
pub fn ensure_ascending(bars: &[OhlcvBar]) -> Result<(), TradestatError> {
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(TradestatError::UnorderedSeries {
                code: pair[1].code.clone(),
                index: i + 1,
            });
        }
    }
    Ok(())
}
