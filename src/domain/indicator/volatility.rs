//! Annualized volatility of a price series.
//!
//! Log returns ln((P[t+1] + D[t+1]) / P[t]), where D is an optional dividend
//! paid on day t+1, then sample standard deviation scaled by sqrt(periods per year).

use super::sample_stddev;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodicity {
    Daily,
    Monthly,
}

impl Periodicity {
    pub fn periods_per_year(self) -> f64 {
        match self {
            Periodicity::Daily => 252.0,
            Periodicity::Monthly => 12.0,
        }
    }
}

/// One return per consecutive price pair, so the result has `len - 1` entries.
/// `dividends`, when given, must be aligned with `prices`.
pub fn log_returns(prices: &[f64], dividends: Option<&[f64]>) -> Vec<f64> {
    if let Some(divs) = dividends {
        assert_eq!(
            divs.len(),
            prices.len(),
            "dividends must be aligned with prices"
        );
    }

    prices
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let add_back = dividends.map_or(0.0, |d| d[i + 1]);
            ((w[1] + add_back) / w[0]).ln()
        })
        .collect()
}

/// `None` when fewer than two finite returns are available.
pub fn annualized_volatility(
    prices: &[f64],
    dividends: Option<&[f64]>,
    periodicity: Periodicity,
) -> Option<f64> {
    let returns: Vec<f64> = log_returns(prices, dividends)
        .into_iter()
        .filter(|r| r.is_finite())
        .collect();

    if returns.len() < 2 {
        return None;
    }
    Some(sample_stddev(&returns) * periodicity.periods_per_year().sqrt())
}
