//! CSV export of per-symbol summaries and completed trades.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::TradestatError;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    symbol: String,
    strategy: &'a str,
    bars: usize,
    volatility: Option<f64>,
    trades: usize,
    win_rate: f64,
    loss_rate: f64,
    avg_win: f64,
    avg_loss: f64,
    profit_factor: Option<f64>,
    expectancy: f64,
    max_consecutive_losses: usize,
    days_held: i64,
    trades_per_year: f64,
    market_return: f64,
    weighted_return: Option<f64>,
    irr: f64,
    static_pnl: f64,
}

#[derive(Debug, Serialize)]
struct TradeRow {
    symbol: String,
    buy_date: String,
    buy_price: f64,
    sell_date: String,
    sell_price: f64,
    days_held: i64,
    result: f64,
}

fn csv_err(path: &Path, e: csv::Error) -> TradestatError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => TradestatError::Io(io),
        other => TradestatError::Io(std::io::Error::other(format!(
            "{}: {:?}",
            path.display(),
            other
        ))),
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TradestatError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| csv_err(path, e))?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

/// Writes reports as comma-separated files with a header row.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write_summary(&self, report: &AnalysisReport, path: &Path) -> Result<(), TradestatError> {
        let rows: Vec<SummaryRow<'_>> = report
            .symbols
            .iter()
            .map(|s| SummaryRow {
                symbol: format!("{}.{}", s.code, s.exchange),
                strategy: &report.strategy,
                bars: s.bars,
                volatility: s.volatility,
                trades: s.summary.trades,
                win_rate: s.summary.win_rate,
                loss_rate: s.summary.loss_rate,
                avg_win: s.summary.avg_win,
                avg_loss: s.summary.avg_loss,
                profit_factor: s.summary.profit_factor,
                expectancy: s.summary.expectancy,
                max_consecutive_losses: s.summary.max_consecutive_losses,
                days_held: s.summary.days_held,
                trades_per_year: s.summary.trades_per_year,
                market_return: s.summary.market_return,
                weighted_return: s.summary.weighted_return,
                irr: s.summary.irr,
                static_pnl: s.summary.static_pnl,
            })
            .collect();
        write_rows(path, &rows)
    }

    fn write_trades(&self, report: &AnalysisReport, path: &Path) -> Result<(), TradestatError> {
        let rows: Vec<TradeRow> = report
            .symbols
            .iter()
            .flat_map(|s| {
                let symbol = format!("{}.{}", s.code, s.exchange);
                s.trades
                    .round_trips()
                    .map(move |rt| TradeRow {
                        symbol: symbol.clone(),
                        buy_date: rt.buy.date.to_string(),
                        buy_price: rt.buy.price,
                        sell_date: rt.sell.date.to_string(),
                        sell_price: rt.sell.price,
                        days_held: rt.days_held(),
                        result: rt.result(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        write_rows(path, &rows)
    }
}
