//! Trades and the buy/sell assembler.
//!
//! `tradify` turns a stream of buy/sell signals into a `TradeLog`: an even,
//! strictly alternating buy, sell, buy, sell... sequence where each buy
//! precedes its sell. Statistics take `&TradeLog`, so they never see a
//! malformed sequence.

use crate::domain::error::TradestatError;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub price: f64,
    pub side: Side,
}

/// A buy and the sell that closes it.
#[derive(Debug, Clone, Copy)]
pub struct RoundTrip<'a> {
    pub buy: &'a Trade,
    pub sell: &'a Trade,
}

impl RoundTrip<'_> {
    /// (sell - buy) / buy
    pub fn result(&self) -> f64 {
        (self.sell.price - self.buy.price) / self.buy.price
    }

    pub fn days_held(&self) -> i64 {
        (self.sell.date - self.buy.date).num_days()
    }
}

/// Completed trades only: even length, alternating from buy to sell, and
/// each buy dated strictly before its sell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLog {
    trades: Vec<Trade>,
}

impl TradeLog {
    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_inner(self) -> Vec<Trade> {
        self.trades
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Number of completed buy/sell pairs.
    pub fn pair_count(&self) -> usize {
        self.trades.len() / 2
    }

    pub fn round_trips(&self) -> impl Iterator<Item = RoundTrip<'_>> {
        self.trades
            .chunks_exact(2)
            .map(|pair| RoundTrip {
                buy: &pair[0],
                sell: &pair[1],
            })
    }

    pub fn first(&self) -> Option<&Trade> {
        self.trades.first()
    }

    pub fn last(&self) -> Option<&Trade> {
        self.trades.last()
    }
}

impl TryFrom<Vec<Trade>> for TradeLog {
    type Error = TradestatError;

    fn try_from(trades: Vec<Trade>) -> Result<Self, Self::Error> {
        if let Some(reason) = malformation(&trades) {
            return Err(TradestatError::MalformedTrades { reason });
        }
        Ok(TradeLog { trades })
    }
}

pub fn is_well_formed(trades: &[Trade]) -> bool {
    malformation(trades).is_none()
}

fn malformation(trades: &[Trade]) -> Option<String> {
    if trades.len() % 2 != 0 {
        return Some(format!("odd number of trades ({})", trades.len()));
    }
    for (i, pair) in trades.chunks_exact(2).enumerate() {
        let (buy, sell) = (&pair[0], &pair[1]);
        if buy.side != Side::Buy || sell.side != Side::Sell {
            return Some(format!("pair {i} is not buy then sell"));
        }
        if buy.date >= sell.date {
            return Some(format!("pair {i} sells on or before its buy date"));
        }
    }
    None
}

/// Assemble completed trades from signals ordered by date.
///
/// Runs of the same side keep their first entry, a leading sell and a
/// trailing buy are dropped. Applying it to its own output is a no-op.
///
/// # Panics
///
/// If signal dates are not strictly ascending.
pub fn tradify(signals: &[Trade]) -> TradeLog {
    if let Some(i) = signals.windows(2).position(|w| w[0].date >= w[1].date) {
        panic!(
            "signals must be strictly ascending by date: {} then {} at index {}",
            signals[i].date,
            signals[i + 1].date,
            i + 1
        );
    }
    if signals.len() < 2 || (signals.len() == 2 && signals[0].side != Side::Buy) {
        return TradeLog::default();
    }

    let mut trades: Vec<Trade> = Vec::with_capacity(signals.len());
    for signal in signals {
        if trades.last().is_none_or(|prev| prev.side != signal.side) {
            trades.push(*signal);
        }
    }

    if trades.first().is_some_and(|t| t.side == Side::Sell) {
        trades.remove(0);
    }
    if trades.last().is_some_and(|t| t.side == Side::Buy) {
        trades.pop();
    }

    TradeLog { trades }
}
