//! Crossover strategies: indicator lines in, completed trades out.
//!
//! Indicators read the configured `field`; trades are always priced at the
//! bar's close.

use crate::domain::indicator::{dema, ema, macd, rsi, sma, stochastic_bars, tema, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::{extract_field, Field};
use crate::domain::signal::{generate_signals, PairPoint, SignalWindow};
use crate::domain::trade::{tradify, Trade, TradeLog};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AverageKind {
    Sma,
    Ema,
    Dema,
    Tema,
}

impl AverageKind {
    pub fn apply(self, values: &[f64], period: usize) -> Vec<f64> {
        match self {
            AverageKind::Sma => sma(values, period),
            AverageKind::Ema => ema(values, period),
            AverageKind::Dema => dema(values, period),
            AverageKind::Tema => tema(values, period),
        }
    }

    pub fn indicator(self, period: usize) -> IndicatorType {
        match self {
            AverageKind::Sma => IndicatorType::Sma(period),
            AverageKind::Ema => IndicatorType::Ema(period),
            AverageKind::Dema => IndicatorType::Dema(period),
            AverageKind::Tema => IndicatorType::Tema(period),
        }
    }
}

impl fmt::Display for AverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AverageKind::Sma => "sma",
            AverageKind::Ema => "ema",
            AverageKind::Dema => "dema",
            AverageKind::Tema => "tema",
        };
        f.write_str(s)
    }
}

impl FromStr for AverageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(AverageKind::Sma),
            "ema" => Ok(AverageKind::Ema),
            "dema" => Ok(AverageKind::Dema),
            "tema" => Ok(AverageKind::Tema),
            other => Err(format!("unknown moving average '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyKind {
    /// MACD line crossing its signal line.
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// Fast average crossing the slow one.
    MovingAverageCross {
        average: AverageKind,
        fast: usize,
        slow: usize,
    },
    /// %K crossing %D.
    Stochastic {
        lookback: usize,
        k_period: usize,
        d_period: usize,
    },
    /// RSI crossing a fixed level: buy on the way up, sell on the way down.
    Rsi { period: usize, level: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub name: String,
    pub kind: StrategyKind,
    pub field: Field,
    pub window: SignalWindow,
}

impl Strategy {
    pub fn new(kind: StrategyKind, field: Field, window: SignalWindow) -> Self {
        let name = match kind {
            StrategyKind::Macd { .. } => "MACD crossover".to_string(),
            StrategyKind::MovingAverageCross { average, .. } => {
                format!("{} crossover", average.to_string().to_uppercase())
            }
            StrategyKind::Stochastic { .. } => "Stochastic %K/%D crossover".to_string(),
            StrategyKind::Rsi { level, .. } => format!("RSI {} crossover", level),
        };
        Strategy {
            name,
            kind,
            field,
            window,
        }
    }

    /// Indicators the strategy reads.
    pub fn indicators(&self) -> Vec<IndicatorType> {
        match self.kind {
            StrategyKind::Macd { fast, slow, signal } => {
                vec![IndicatorType::Macd { fast, slow, signal }]
            }
            StrategyKind::MovingAverageCross {
                average,
                fast,
                slow,
            } => vec![average.indicator(fast), average.indicator(slow)],
            StrategyKind::Stochastic {
                lookback,
                k_period,
                d_period,
            } => vec![IndicatorType::Stochastic {
                lookback,
                k_period,
                d_period,
            }],
            StrategyKind::Rsi { period, .. } => vec![IndicatorType::Rsi(period)],
        }
    }

    /// Bars before the first position where every crossover input is defined.
    pub fn warmup(&self) -> usize {
        match self.kind {
            StrategyKind::Macd { fast, slow, signal } => {
                fast.max(slow).saturating_sub(1) + signal.saturating_sub(1)
            }
            StrategyKind::MovingAverageCross {
                average,
                fast,
                slow,
            } => average.indicator(fast.max(slow)).warmup(),
            StrategyKind::Stochastic {
                k_period, d_period, ..
            } => k_period.saturating_sub(1) + d_period.saturating_sub(1),
            StrategyKind::Rsi { period, .. } => IndicatorType::Rsi(period).warmup(),
        }
    }

    /// Raw buy/sell signals, before trade assembly.
    pub fn signals(&self, bars: &[OhlcvBar]) -> Vec<Trade> {
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let prices: Vec<f64> = bars.iter().map(|b| b.close).collect();

        match self.kind {
            StrategyKind::Macd { fast, slow, signal } => {
                let values = extract_field(bars, self.field);
                let points = macd(&values, fast, slow, signal).points();
                generate_signals(&dates, &prices, &points, self.window)
            }
            StrategyKind::MovingAverageCross {
                average,
                fast,
                slow,
            } => {
                let values = extract_field(bars, self.field);
                let points = pair_points(&average.apply(&values, fast), &average.apply(&values, slow));
                generate_signals(&dates, &prices, &points, self.window)
            }
            StrategyKind::Stochastic {
                lookback,
                k_period,
                d_period,
            } => {
                let s = stochastic_bars(bars, lookback, k_period, d_period);
                let points = pair_points(&s.k, &s.d);
                generate_signals(&dates, &prices, &points, self.window)
            }
            StrategyKind::Rsi { period, level } => {
                let values = extract_field(bars, self.field);
                let levels = vec![level; values.len()];
                let points = pair_points(&rsi(&values, period), &levels);
                generate_signals(&dates, &prices, &points, self.window)
            }
        }
    }

    pub fn run(&self, bars: &[OhlcvBar]) -> TradeLog {
        tradify(&self.signals(bars))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.indicators().iter().map(|i| i.to_string()).collect();
        write!(
            f,
            "{} [{}] on {} (window {})",
            self.name,
            names.join(", "),
            self.field,
            self.window.size()
        )
    }
}

fn pair_points(fast: &[f64], slow: &[f64]) -> Vec<PairPoint> {
    fast.iter()
        .zip(slow)
        .map(|(&fast, &slow)| PairPoint { fast, slow })
        .collect()
}
