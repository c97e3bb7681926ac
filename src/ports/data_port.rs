//! Data access port trait.

use crate::domain::error::TradestatError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// First date, last date and bar count stored for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub bars: usize,
}

pub trait DataPort {
    /// Bars for `code` on `exchange` within `[start_date, end_date]`, oldest first.
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradestatError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TradestatError>;

    /// `None` when nothing is stored for the symbol.
    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<DataRange>, TradestatError>;
}
