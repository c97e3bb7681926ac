//! Trade-level performance statistics over a `TradeLog`.
//!
//! All returns are fractions (0.05 = 5%). `subtract` is a per-trade hurdle
//! taken off every result before it is classified (e.g. round-trip costs as
//! a fraction). Weighted variants weight the i-th trade (1-based, oldest
//! first) by i, so recent trades count more.
//!
//! Conventions for degenerate input: rates and expectancy over an empty log
//! are 0; `profit_factor` is `None` when there is nothing on the loss side;
//! `weighted` over no values is `None`.

use crate::domain::trade::{Trade, TradeLog};

const DAYS_PER_YEAR: f64 = 365.25;
const IRR_DAYS_PER_YEAR: f64 = 365.0;

/// (sell - buy) / buy
pub fn result(buy: &Trade, sell: &Trade) -> f64 {
    (sell.price - buy.price) / buy.price
}

/// One result per completed trade, oldest first.
pub fn results(log: &TradeLog) -> Vec<f64> {
    log.round_trips().map(|rt| rt.result()).collect()
}

pub fn days_held(log: &TradeLog) -> i64 {
    log.round_trips().map(|rt| rt.days_held()).sum()
}

/// Completed trades per 365.25-day year over the span of the log.
pub fn trades_per_year(log: &TradeLog) -> f64 {
    match (log.first(), log.last()) {
        (Some(first), Some(last)) => {
            let years = (last.date - first.date).num_days() as f64 / DAYS_PER_YEAR;
            log.pair_count() as f64 / years
        }
        _ => 0.0,
    }
}

/// Buy-and-hold return from the first buy to the last sell.
pub fn market_return(log: &TradeLog) -> f64 {
    match (log.first(), log.last()) {
        (Some(first), Some(last)) => result(first, last),
        _ => 0.0,
    }
}

fn adjusted(log: &TradeLog, subtract: f64) -> Vec<f64> {
    results(log).into_iter().map(|r| r - subtract).collect()
}

fn rate<F>(values: &[f64], weighted: bool, pred: F) -> f64
where
    F: Fn(f64) -> bool,
{
    if values.is_empty() {
        return 0.0;
    }
    if weighted {
        let n = values.len();
        let hits: usize = values
            .iter()
            .enumerate()
            .filter(|(_, v)| pred(**v))
            .map(|(i, _)| i + 1)
            .sum();
        hits as f64 / (n * (n + 1) / 2) as f64
    } else {
        values.iter().filter(|v| pred(**v)).count() as f64 / values.len() as f64
    }
}

/// Fraction of trades whose result exceeds `subtract`.
pub fn win_rate(log: &TradeLog, subtract: f64, weighted: bool) -> f64 {
    rate(&adjusted(log, subtract), weighted, |r| r > 0.0)
}

/// Fraction of trades whose result falls short of `subtract`.
pub fn loss_rate(log: &TradeLog, subtract: f64, weighted: bool) -> f64 {
    rate(&adjusted(log, subtract), weighted, |r| r < 0.0)
}

pub fn wins(log: &TradeLog, subtract: f64) -> Vec<f64> {
    adjusted(log, subtract)
        .into_iter()
        .filter(|r| *r > 0.0)
        .collect()
}

/// Losing results as positive magnitudes.
pub fn losses(log: &TradeLog, subtract: f64) -> Vec<f64> {
    adjusted(log, subtract)
        .into_iter()
        .filter(|r| *r < 0.0)
        .map(f64::abs)
        .collect()
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// (mean win * win rate, mean loss * loss rate)
fn expected_sides(log: &TradeLog, subtract: f64) -> (f64, f64) {
    let gain = mean_or_zero(&wins(log, subtract)) * win_rate(log, subtract, false);
    let loss = mean_or_zero(&losses(log, subtract)) * loss_rate(log, subtract, false);
    (gain, loss)
}

/// (mean win * win rate) / (mean loss * loss rate); `None` without losses.
pub fn profit_factor(log: &TradeLog, subtract: f64) -> Option<f64> {
    let (gain, loss) = expected_sides(log, subtract);
    if loss == 0.0 { None } else { Some(gain / loss) }
}

/// (mean win * win rate) - (mean loss * loss rate)
pub fn expectancy(log: &TradeLog, subtract: f64) -> f64 {
    let (gain, loss) = expected_sides(log, subtract);
    gain - loss
}

/// Longest run of consecutive trades with result <= `subtract`.
pub fn max_consecutive_losses(log: &TradeLog, subtract: f64) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for r in adjusted(log, subtract) {
        if r <= 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Annualized growth when all capital is rolled into each trade in turn.
///
/// Each buy takes `floor((capital - brokerage) / price)` units and pays
/// brokerage on both legs. A trade where not even one unit is affordable is
/// skipped. Returns 0 if capital ends where it started and -1 if it ends at
/// or below zero; otherwise `(end / start)^(1 / years) - 1` with 365-day years
/// between the first buy and the last sell.
pub fn irr(log: &TradeLog, start_value: f64, brokerage: f64) -> f64 {
    let mut capital = start_value;
    for rt in log.round_trips() {
        if rt.buy.price <= 0.0 {
            continue;
        }
        let units = ((capital - brokerage) / rt.buy.price).floor();
        if units < 1.0 {
            continue;
        }
        capital -= units * rt.buy.price + brokerage;
        capital += units * rt.sell.price - brokerage;
    }

    if capital == start_value {
        return 0.0;
    }
    if capital <= 0.0 {
        return -1.0;
    }

    match (log.first(), log.last()) {
        (Some(first), Some(last)) => {
            let years = (last.date - first.date).num_days() as f64 / IRR_DAYS_PER_YEAR;
            (capital / start_value).powf(1.0 / years) - 1.0
        }
        _ => 0.0,
    }
}

/// Dollar P&L from putting the same `invest` amount into every trade.
pub fn static_invest(log: &TradeLog, invest: f64, brokerage: f64) -> f64 {
    let mut pnl = 0.0;
    for rt in log.round_trips() {
        if rt.buy.price <= 0.0 {
            continue;
        }
        let units = ((invest - brokerage) / rt.buy.price).floor();
        if units < 1.0 {
            continue;
        }
        pnl += units * (rt.sell.price - rt.buy.price) - 2.0 * brokerage;
    }
    pnl
}

/// Chronologically weighted mean: sum(i * (v_i - brokerage)) / sum(i), i = 1..N.
pub fn weighted(values: &[f64], brokerage: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let total: f64 = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * (v - brokerage))
        .sum();
    Some(total / (n * (n + 1) / 2) as f64)
}

/// Parameters for `TradeSummary::compute`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    pub initial_capital: f64,
    pub brokerage: f64,
    pub static_invest: f64,
    pub subtract: f64,
    pub weighted: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            initial_capital: 10_000.0,
            brokerage: 0.0,
            static_invest: 1_000.0,
            subtract: 0.0,
            weighted: false,
        }
    }
}

/// Every statistic for one trade log, as reported per symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub trades: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: Option<f64>,
    pub expectancy: f64,
    pub max_consecutive_losses: usize,
    pub days_held: i64,
    pub trades_per_year: f64,
    pub market_return: f64,
    pub weighted_return: Option<f64>,
    pub irr: f64,
    pub static_pnl: f64,
}

impl TradeSummary {
    pub fn compute(log: &TradeLog, config: &StatsConfig) -> Self {
        let subtract = config.subtract;
        TradeSummary {
            trades: log.pair_count(),
            win_rate: win_rate(log, subtract, config.weighted),
            loss_rate: loss_rate(log, subtract, config.weighted),
            avg_win: mean_or_zero(&wins(log, subtract)),
            avg_loss: mean_or_zero(&losses(log, subtract)),
            profit_factor: profit_factor(log, subtract),
            expectancy: expectancy(log, subtract),
            max_consecutive_losses: max_consecutive_losses(log, subtract),
            days_held: days_held(log),
            trades_per_year: trades_per_year(log),
            market_return: market_return(log),
            weighted_return: weighted(&results(log), subtract),
            irr: irr(log, config.initial_capital, config.brokerage),
            static_pnl: static_invest(log, config.static_invest, config.brokerage),
        }
    }
}
