//! Crossover signal generation.
//!
//! A window of aligned points is split into a first and a second half. The
//! window is a buy when the line sits at or below its trigger throughout the
//! first half and strictly above it throughout the second half; a sell is the
//! mirror image. Sliding the window one position at a time labels the last
//! point of every window.
//!
//! Window size 2 flags any single-bar cross. Size 4 needs two bars on each
//! side of the cross.

use crate::domain::error::TradestatError;
use crate::domain::trade::{Side, Trade};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    None,
}

impl Action {
    pub fn side(self) -> Option<Side> {
        match self {
            Action::Buy => Some(Side::Buy),
            Action::Sell => Some(Side::Sell),
            Action::None => None,
        }
    }
}

/// A point that carries a line and the trigger it is compared against.
pub trait CrossoverPoint {
    fn line(&self) -> f64;
    fn trigger(&self) -> f64;
}

/// MACD tuple: the line is `fast - slow`, the trigger is the signal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub fast: f64,
    pub slow: f64,
    pub signal: f64,
}

impl CrossoverPoint for MacdPoint {
    fn line(&self) -> f64 {
        self.fast - self.slow
    }

    fn trigger(&self) -> f64 {
        self.signal
    }
}

/// Two series crossing each other: buy when `fast` moves above `slow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairPoint {
    pub fast: f64,
    pub slow: f64,
}

impl CrossoverPoint for PairPoint {
    fn line(&self) -> f64 {
        self.fast
    }

    fn trigger(&self) -> f64 {
        self.slow
    }
}

/// Validated sliding-window size (even, at least 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWindow(usize);

impl SignalWindow {
    pub const SINGLE_BAR: SignalWindow = SignalWindow(2);
    pub const CONFIRMED: SignalWindow = SignalWindow(4);

    pub fn new(size: usize) -> Result<Self, TradestatError> {
        if size < 2 || size % 2 != 0 {
            return Err(TradestatError::InvalidWindow { size });
        }
        Ok(SignalWindow(size))
    }

    pub fn size(self) -> usize {
        self.0
    }
}

impl Default for SignalWindow {
    fn default() -> Self {
        SignalWindow::SINGLE_BAR
    }
}

/// Classify one window. Panics if the window length is odd or zero.
pub fn classify<P: CrossoverPoint>(window: &[P]) -> Action {
    assert!(
        !window.is_empty() && window.len() % 2 == 0,
        "crossover window length must be even and non-zero, got {}",
        window.len()
    );

    let (first, second) = window.split_at(window.len() / 2);
    if first.iter().all(|p| p.trigger() >= p.line())
        && second.iter().all(|p| p.trigger() < p.line())
    {
        Action::Buy
    } else if first.iter().all(|p| p.trigger() <= p.line())
        && second.iter().all(|p| p.trigger() > p.line())
    {
        Action::Sell
    } else {
        Action::None
    }
}

/// One action per point; positions before the first full window are `None`.
pub fn classify_series<P: CrossoverPoint>(points: &[P], window: SignalWindow) -> Vec<Action> {
    let size = window.size();
    let mut actions = vec![Action::None; points.len()];
    for (start, w) in points.windows(size).enumerate() {
        actions[start + size - 1] = classify(w);
    }
    actions
}

/// Buy/sell signals priced at `prices`, with `None` positions dropped.
pub fn generate_signals<P: CrossoverPoint>(
    dates: &[NaiveDate],
    prices: &[f64],
    points: &[P],
    window: SignalWindow,
) -> Vec<Trade> {
    assert!(
        dates.len() == points.len() && prices.len() == points.len(),
        "dates, prices and points must be aligned"
    );

    classify_series(points, window)
        .into_iter()
        .enumerate()
        .filter_map(|(i, action)| {
            action.side().map(|side| Trade {
                date: dates[i],
                price: prices[i],
                side,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macd_pt(line: f64, signal: f64) -> MacdPoint {
        MacdPoint {
            fast: line,
            slow: 0.0,
            signal,
        }
    }

    #[test]
    fn buy_on_cross_above() {
        let w = [macd_pt(-1.0, 0.0), macd_pt(1.0, 0.0)];
        assert_eq!(classify(&w), Action::Buy);
    }

    #[test]
    fn touching_then_above_is_buy() {
        let w = [macd_pt(0.0, 0.0), macd_pt(0.5, 0.0)];
        assert_eq!(classify(&w), Action::Buy);
    }

    #[test]
    fn sell_on_cross_below() {
        let w = [macd_pt(1.0, 0.0), macd_pt(-1.0, 0.0)];
        assert_eq!(classify(&w), Action::Sell);
    }

    #[test]
    fn no_cross_is_none() {
        assert_eq!(
            classify(&[macd_pt(1.0, 0.0), macd_pt(2.0, 0.0)]),
            Action::None
        );
        assert_eq!(
            classify(&[macd_pt(-1.0, 0.0), macd_pt(-2.0, 0.0)]),
            Action::None
        );
    }

    #[test]
    fn equal_second_half_is_none() {
        let w = [macd_pt(-1.0, 0.0), macd_pt(0.0, 0.0)];
        assert_eq!(classify(&w), Action::None);
    }

    #[test]
    fn nan_is_none() {
        let w = [macd_pt(f64::NAN, 0.0), macd_pt(1.0, 0.0)];
        assert_eq!(classify(&w), Action::None);
    }

    #[test]
    fn confirmed_window_needs_two_bars_each_side() {
        let confirmed = [
            macd_pt(-2.0, 0.0),
            macd_pt(-1.0, 0.0),
            macd_pt(1.0, 0.0),
            macd_pt(2.0, 0.0),
        ];
        assert_eq!(classify(&confirmed), Action::Buy);

        let whipsaw = [
            macd_pt(-2.0, 0.0),
            macd_pt(1.0, 0.0),
            macd_pt(1.0, 0.0),
            macd_pt(2.0, 0.0),
        ];
        assert_eq!(classify(&whipsaw), Action::None);
    }

    #[test]
    #[should_panic(expected = "must be even")]
    fn odd_window_panics() {
        classify(&[macd_pt(0.0, 0.0), macd_pt(1.0, 0.0), macd_pt(2.0, 0.0)]);
    }

    #[test]
    fn window_validation() {
        assert_eq!(SignalWindow::new(2).unwrap(), SignalWindow::SINGLE_BAR);
        assert_eq!(SignalWindow::new(4).unwrap(), SignalWindow::CONFIRMED);
        assert!(matches!(
            SignalWindow::new(3),
            Err(TradestatError::InvalidWindow { size: 3 })
        ));
        assert!(SignalWindow::new(0).is_err());
        assert_eq!(SignalWindow::default().size(), 2);
    }

    #[test]
    fn pair_point_crosses() {
        let w = [
            PairPoint {
                fast: 9.0,
                slow: 10.0,
            },
            PairPoint {
                fast: 11.0,
                slow: 10.0,
            },
        ];
        assert_eq!(classify(&w), Action::Buy);
    }

    #[test]
    fn series_labels_last_point_of_window() {
        let pts = [
            macd_pt(-1.0, 0.0),
            macd_pt(1.0, 0.0),
            macd_pt(2.0, 0.0),
            macd_pt(-1.0, 0.0),
        ];
        let actions = classify_series(&pts, SignalWindow::SINGLE_BAR);
        assert_eq!(
            actions,
            vec![Action::None, Action::Buy, Action::None, Action::Sell]
        );
    }

    #[test]
    fn generate_signals_drops_none() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let dates = [d(1), d(2), d(3), d(4)];
        let prices = [10.0, 11.0, 12.0, 9.0];
        let pts = [
            macd_pt(-1.0, 0.0),
            macd_pt(1.0, 0.0),
            macd_pt(2.0, 0.0),
            macd_pt(-1.0, 0.0),
        ];
        let signals = generate_signals(&dates, &prices, &pts, SignalWindow::SINGLE_BAR);

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].side, Side::Buy);
        assert_eq!(signals[0].date, d(2));
        assert_eq!(signals[0].price, 11.0);
        assert_eq!(signals[1].side, Side::Sell);
        assert_eq!(signals[1].date, d(4));
    }

    #[test]
    fn short_series_has_no_signals() {
        let pts = [macd_pt(1.0, 0.0)];
        assert_eq!(
            classify_series(&pts, SignalWindow::CONFIRMED),
            vec![Action::None]
        );
    }
}
