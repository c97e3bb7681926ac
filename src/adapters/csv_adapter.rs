//! CSV directory data adapter.
//!
//! One file per symbol, named `<CODE>_<EXCHANGE>.csv`, with a header row
//! `date,open,high,low,close,volume` and dates as `YYYY-MM-DD`.

use crate::domain::error::TradestatError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::{DataPort, DataRange};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }

    /// Every bar in `path`, in file order.
    pub fn read_file(path: &Path, code: &str, exchange: &str) -> Result<Vec<OhlcvBar>, TradestatError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| TradestatError::Database {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut bars = Vec::new();
        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| TradestatError::Database {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                TradestatError::Database {
                    reason: format!(
                        "{}: invalid date '{}' on record {}: {}",
                        path.display(),
                        row.date,
                        line + 1,
                        e
                    ),
                }
            })?;
            bars.push(OhlcvBar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume as i64,
            });
        }
        Ok(bars)
    }

    /// Split `<CODE>_<EXCHANGE>.csv` into its code and exchange.
    pub fn parse_file_name(name: &str) -> Option<(String, String)> {
        let stem = name.strip_suffix(".csv")?;
        let (code, exchange) = stem.rsplit_once('_')?;
        if code.is_empty() || exchange.is_empty() {
            return None;
        }
        Some((code.to_string(), exchange.to_string()))
    }

    fn load(&self, code: &str, exchange: &str) -> Result<Vec<OhlcvBar>, TradestatError> {
        let path = self.csv_path(code, exchange);
        let mut bars = Self::read_file(&path, code, exchange)?;
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradestatError> {
        let mut bars = self.load(code, exchange)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TradestatError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradestatError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TradestatError::Database {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some((code, ex)) = Self::parse_file_name(&name.to_string_lossy()) {
                if ex == exchange {
                    symbols.push(code);
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<DataRange>, TradestatError> {
        if !self.csv_path(code, exchange).exists() {
            return Ok(None);
        }
        let bars = self.load(code, exchange)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some(DataRange {
                first: first.date,
                last: last.date,
                bars: bars.len(),
            }),
            _ => None,
        })
    }
}
