//! Universe of codes to analyze.
//!
//! Parses code lists from configuration and loads each code's bars, skipping
//! codes without enough history.

use crate::domain::error::TradestatError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::ensure_ascending;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

pub const MIN_OHLCV_BARS: usize = 30;

#[derive(Debug, Clone)]
pub struct Universe {
    pub codes: Vec<String>,
    pub exchange: String,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.codes.len()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

/// Bars for one code, ascending by date.
#[derive(Debug, Clone)]
pub struct CodeSeries {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

#[derive(Debug)]
pub struct LoadedUniverse {
    pub exchange: String,
    pub series: Vec<CodeSeries>,
    pub skipped: Vec<SkippedCode>,
}

/// Fetch every code in `universe`. Codes that fail to load or have fewer
/// than `min_bars` bars are skipped; a series that is not strictly ascending
/// by date is an error. Fails with `InsufficientData` if nothing survives.
pub fn load_universe(
    data_port: &dyn DataPort,
    universe: &Universe,
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_bars: usize,
) -> Result<LoadedUniverse, TradestatError> {
    let exchange = universe.exchange.as_str();
    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for code in &universe.codes {
        let bars = match data_port.fetch_ohlcv(code, exchange, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!(code = %code, exchange, error = %e, "skipping code");
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if bars.is_empty() {
            tracing::warn!(code = %code, exchange, "skipping code: no data found");
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < min_bars {
            tracing::warn!(
                code = %code,
                exchange,
                bars = bars.len(),
                minimum = min_bars,
                "skipping code: insufficient bars"
            );
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        ensure_ascending(&bars)?;
        tracing::debug!(code = %code, bars = bars.len(), "loaded");
        series.push(CodeSeries {
            code: code.clone(),
            bars,
        });
    }

    if series.is_empty() {
        return Err(TradestatError::InsufficientData {
            code: "all".to_string(),
            exchange: exchange.to_string(),
            bars: 0,
            minimum: min_bars,
        });
    }

    if !skipped.is_empty() {
        tracing::info!(
            loaded = series.len(),
            total = universe.count(),
            exchange,
            "universe partially loaded"
        );
    }

    Ok(LoadedUniverse {
        exchange: exchange.to_string(),
        series,
        skipped,
    })
}
