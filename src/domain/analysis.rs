//! Per-symbol analysis over a loaded universe.
//!
//! Each code runs independently: strategy signals, trade assembly, then
//! statistics. Codes are processed in parallel; the report keeps the order
//! the universe was loaded in.

use crate::domain::indicator::{annualized_volatility, Periodicity};
use crate::domain::series::{extract_field, Field};
use crate::domain::strategy::Strategy;
use crate::domain::trade::TradeLog;
use crate::domain::trade_stats::{StatsConfig, TradeSummary};
use crate::domain::universe::{CodeSeries, LoadedUniverse};
use chrono::NaiveDate;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_bars: usize,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub code: String,
    pub exchange: String,
    pub bars: usize,
    /// Annualized volatility of daily closes over the loaded range.
    pub volatility: Option<f64>,
    pub trades: TradeLog,
    pub summary: TradeSummary,
}

/// Cross-code roll-up. Trades are not pooled across codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub codes: usize,
    pub total_trades: usize,
    pub mean_irr: f64,
    pub total_static_pnl: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub strategy: String,
    pub symbols: Vec<SymbolReport>,
    pub aggregate: Aggregate,
}

pub fn analyze_series(
    series: &CodeSeries,
    exchange: &str,
    strategy: &Strategy,
    stats: &StatsConfig,
) -> SymbolReport {
    let trades = strategy.run(&series.bars);
    let summary = TradeSummary::compute(&trades, stats);
    let volatility = annualized_volatility(
        &extract_field(&series.bars, Field::Close),
        None,
        Periodicity::Daily,
    );
    tracing::debug!(
        code = %series.code,
        trades = summary.trades,
        irr = summary.irr,
        "analyzed"
    );
    SymbolReport {
        code: series.code.clone(),
        exchange: exchange.to_string(),
        bars: series.bars.len(),
        volatility,
        trades,
        summary,
    }
}

pub fn analyze_universe(
    universe: &LoadedUniverse,
    strategy: &Strategy,
    stats: &StatsConfig,
) -> AnalysisReport {
    let symbols: Vec<SymbolReport> = universe
        .series
        .par_iter()
        .map(|series| analyze_series(series, &universe.exchange, strategy, stats))
        .collect();

    let aggregate = aggregate(&symbols);
    tracing::info!(
        codes = aggregate.codes,
        trades = aggregate.total_trades,
        "analysis complete"
    );

    AnalysisReport {
        strategy: strategy.to_string(),
        symbols,
        aggregate,
    }
}

pub fn aggregate(symbols: &[SymbolReport]) -> Aggregate {
    let codes = symbols.len();
    let mean_irr = if codes == 0 {
        0.0
    } else {
        symbols.iter().map(|s| s.summary.irr).sum::<f64>() / codes as f64
    };
    Aggregate {
        codes,
        total_trades: symbols.iter().map(|s| s.summary.trades).sum(),
        mean_irr,
        total_static_pnl: symbols.iter().map(|s| s.summary.static_pnl).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use crate::domain::series::Field;
    use crate::domain::signal::SignalWindow;
    use crate::domain::strategy::{AverageKind, StrategyKind};

    fn make_series(code: &str, closes: &[f64]) -> CodeSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                code: code.into(),
                exchange: "ASX".into(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100,
            })
            .collect();
        CodeSeries {
            code: code.into(),
            bars,
        }
    }

    fn wave(n: usize, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + 8.0 * ((i as f64 + phase) / 6.0).sin())
            .collect()
    }

    fn strategy() -> Strategy {
        Strategy::new(
            StrategyKind::MovingAverageCross {
                average: AverageKind::Sma,
                fast: 3,
                slow: 8,
            },
            Field::Close,
            SignalWindow::SINGLE_BAR,
        )
    }

    #[test]
    fn report_preserves_universe_order() {
        let universe = LoadedUniverse {
            exchange: "ASX".into(),
            series: vec![
                make_series("BHP", &wave(120, 0.0)),
                make_series("CBA", &wave(120, 2.0)),
                make_series("WBC", &wave(120, 4.0)),
            ],
            skipped: vec![],
        };
        let report = analyze_universe(&universe, &strategy(), &StatsConfig::default());

        let codes: Vec<&str> = report.symbols.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["BHP", "CBA", "WBC"]);
        assert!(report.symbols.iter().all(|s| s.bars == 120));
        assert!(report.symbols.iter().all(|s| s.volatility.is_some_and(|v| v > 0.0)));
        assert!(report.symbols.iter().all(|s| s.summary.trades > 0));
    }

    #[test]
    fn aggregate_sums_and_averages() {
        let universe = LoadedUniverse {
            exchange: "ASX".into(),
            series: vec![
                make_series("BHP", &wave(120, 0.0)),
                make_series("CBA", &wave(120, 3.0)),
            ],
            skipped: vec![],
        };
        let report = analyze_universe(&universe, &strategy(), &StatsConfig::default());
        let a = &report.aggregate;

        let trades: usize = report.symbols.iter().map(|s| s.summary.trades).sum();
        let pnl: f64 = report.symbols.iter().map(|s| s.summary.static_pnl).sum();
        let irr = (report.symbols[0].summary.irr + report.symbols[1].summary.irr) / 2.0;

        assert_eq!(a.codes, 2);
        assert_eq!(a.total_trades, trades);
        assert!((a.total_static_pnl - pnl).abs() < 1e-9);
        assert!((a.mean_irr - irr).abs() < 1e-12);
    }

    #[test]
    fn empty_aggregate_is_zero() {
        let a = aggregate(&[]);
        assert_eq!(a.codes, 0);
        assert_eq!(a.total_trades, 0);
        assert_eq!(a.mean_irr, 0.0);
    }
}
