//! OHLCV bar representation.

use chrono::NaiveDate;

/// One end-of-day observation for a symbol. `code` + `exchange` identify the
/// series the bar belongs to; nothing in the engine interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// `CODE.EXCHANGE`, the key used in reports.
    pub fn symbol(&self) -> String {
        format!("{}.{}", self.code, self.exchange)
    }
}
