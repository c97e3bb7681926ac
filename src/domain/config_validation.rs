//! Configuration validation.
//!
//! Checks the `[analysis]` and `[strategy]` sections before any data is
//! loaded, so a bad file fails fast with the offending section and key.

use crate::domain::error::TradestatError;
use crate::domain::series::Field;
use crate::domain::strategy::AverageKind;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const STRATEGY_KINDS: [&str; 4] = ["macd", "ma_cross", "stochastic", "rsi"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    validate_positive(config, "analysis", "initial_capital", 10_000.0)?;
    validate_positive(config, "analysis", "static_invest", 1_000.0)?;
    validate_brokerage(config)?;
    validate_dates(config)?;
    validate_exchange(config)?;
    validate_codes(config)?;
    validate_field(config)?;
    validate_min_bars(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let kind = config
        .get_string("strategy", "kind")
        .unwrap_or_else(|| "macd".to_string())
        .trim()
        .to_lowercase();

    match kind.as_str() {
        "macd" => {
            let fast = validate_period(config, "fast", 12)?;
            let slow = validate_period(config, "slow", 26)?;
            validate_period(config, "signal", 9)?;
            validate_fast_below_slow(fast, slow)?;
        }
        "ma_cross" => {
            let fast = validate_period(config, "fast", 12)?;
            let slow = validate_period(config, "slow", 26)?;
            validate_fast_below_slow(fast, slow)?;
            validate_average(config)?;
        }
        "stochastic" => {
            validate_period(config, "lookback", 14)?;
            validate_period(config, "k_period", 3)?;
            validate_period(config, "d_period", 3)?;
        }
        "rsi" => {
            validate_period(config, "period", 14)?;
            validate_level(config)?;
        }
        other => {
            return Err(invalid(
                "strategy",
                "kind",
                format!(
                    "unknown strategy kind '{}', expected one of {}",
                    other,
                    STRATEGY_KINDS.join(", ")
                ),
            ));
        }
    }

    validate_window(config)
}

fn invalid(section: &str, key: &str, reason: String) -> TradestatError {
    TradestatError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), TradestatError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 {
        return Err(invalid(section, key, format!("{} must be positive", key)));
    }
    Ok(())
}

fn validate_brokerage(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let value = config.get_double("analysis", "brokerage", 0.0);
    if value < 0.0 {
        return Err(invalid(
            "analysis",
            "brokerage",
            "brokerage must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "analysis",
            "start_date",
            "start_date must be before end_date".to_string(),
        ));
    }
    Ok(())
}

/// Read a `YYYY-MM-DD` date from `[analysis]`.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TradestatError> {
    match config.get_string("analysis", key) {
        None => Err(TradestatError::ConfigMissing {
            section: "analysis".to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "analysis",
                key,
                format!("invalid {} format, expected YYYY-MM-DD", key),
            )
        }),
    }
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    match config.get_string("analysis", "exchange") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TradestatError::ConfigMissing {
            section: "analysis".to_string(),
            key: "exchange".to_string(),
        }),
    }
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let (key, list) = match (
        config.get_string("analysis", "codes"),
        config.get_string("analysis", "code"),
    ) {
        (Some(c), _) if !c.trim().is_empty() => ("codes", c),
        (_, Some(c)) if !c.trim().is_empty() => ("code", c),
        _ => {
            return Err(TradestatError::ConfigMissing {
                section: "analysis".to_string(),
                key: "code".to_string(),
            });
        }
    };

    parse_codes(&list)
        .map(|_| ())
        .map_err(|e| invalid("analysis", key, e.to_string()))
}

fn validate_field(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    if let Some(s) = config.get_string("analysis", "field") {
        s.parse::<Field>()
            .map_err(|reason| invalid("analysis", "field", reason))?;
    }
    Ok(())
}

fn validate_min_bars(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let value = config.get_int("analysis", "min_bars", 30);
    if value < 1 {
        return Err(invalid(
            "analysis",
            "min_bars",
            "min_bars must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_period(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
) -> Result<usize, TradestatError> {
    let value = config.get_int("strategy", key, default);
    if value < 1 {
        return Err(invalid(
            "strategy",
            key,
            format!("{} must be at least 1", key),
        ));
    }
    Ok(value as usize)
}

fn validate_level(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let level = config.get_double("strategy", "level", 50.0);
    if !(level > 0.0 && level < 100.0) {
        return Err(invalid(
            "strategy",
            "level",
            format!("level must be between 0 and 100, got {}", level),
        ));
    }
    Ok(())
}

fn validate_fast_below_slow(fast: usize, slow: usize) -> Result<(), TradestatError> {
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "fast",
            format!("fast period ({}) must be shorter than slow ({})", fast, slow),
        ));
    }
    Ok(())
}

fn validate_average(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    if let Some(s) = config.get_string("strategy", "average") {
        s.parse::<AverageKind>()
            .map_err(|reason| invalid("strategy", "average", reason))?;
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), TradestatError> {
    let size = config.get_int("strategy", "window", 2);
    if size < 2 || size % 2 != 0 {
        return Err(invalid(
            "strategy",
            "window",
            format!("window must be even and at least 2, got {}", size),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const BASE: &str = "[analysis]\nstart_date = 2020-01-01\nend_date = 2024-12-31\nexchange = ASX\ncode = CBA\n";

    fn with_analysis(extra: &str) -> FileConfigAdapter {
        make_config(&format!("{}{}", BASE, extra))
    }

    #[test]
    fn valid_analysis_config_passes() {
        let config = make_config(
            r#"
[analysis]
initial_capital = 10000
brokerage = 9.95
static_invest = 1000
subtract = 0.01
weighted = true
start_date = 2020-01-01
end_date = 2024-12-31
exchange = ASX
codes = CBA,BHP
field = typical
min_bars = 60
"#,
        );
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn initial_capital_must_be_positive() {
        let config = with_analysis("initial_capital = 0\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(
            matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn static_invest_must_be_positive() {
        let config = with_analysis("static_invest = -5\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "static_invest"));
    }

    #[test]
    fn negative_brokerage_fails() {
        let config = with_analysis("brokerage = -1\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "brokerage"));
    }

    #[test]
    fn invalid_start_date_format_fails() {
        let config = make_config(
            "[analysis]\nstart_date = 2020/01/01\nend_date = 2024-12-31\nexchange = ASX\ncode = CBA\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_end_date_fails() {
        let config = make_config("[analysis]\nstart_date = 2020-01-01\nexchange = ASX\ncode = CBA\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_date_after_end_date_fails() {
        let config = make_config(
            "[analysis]\nstart_date = 2024-12-31\nend_date = 2020-01-01\nexchange = ASX\ncode = CBA\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_exchange_fails() {
        let config = make_config("[analysis]\nstart_date = 2020-01-01\nend_date = 2024-12-31\ncode = CBA\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigMissing { key, .. } if key == "exchange"));
    }

    #[test]
    fn missing_code_fails() {
        let config = make_config("[analysis]\nstart_date = 2020-01-01\nend_date = 2024-12-31\nexchange = ASX\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigMissing { key, .. } if key == "code"));
    }

    #[test]
    fn duplicate_codes_fail() {
        let config = make_config(
            "[analysis]\nstart_date = 2020-01-01\nend_date = 2024-12-31\nexchange = ASX\ncodes = CBA,BHP,CBA\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "codes"));
    }

    #[test]
    fn unknown_field_fails() {
        let config = with_analysis("field = vwap\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "field"));
    }

    #[test]
    fn zero_min_bars_fails() {
        let config = with_analysis("min_bars = 0\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "min_bars"));
    }

    #[test]
    fn default_strategy_is_valid_macd() {
        let config = make_config("[strategy]\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn valid_ma_cross_passes() {
        let config = make_config(
            "[strategy]\nkind = ma_cross\naverage = dema\nfast = 10\nslow = 30\nwindow = 4\n",
        );
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn unknown_kind_fails() {
        let config = make_config("[strategy]\nkind = rsi_band\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "kind"));
    }

    #[test]
    fn fast_not_below_slow_fails() {
        let config = make_config("[strategy]\nkind = macd\nfast = 26\nslow = 12\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "fast"));
    }

    #[test]
    fn zero_period_fails() {
        let config = make_config("[strategy]\nkind = stochastic\nk_period = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "k_period"));
    }

    #[test]
    fn rsi_level_out_of_range_fails() {
        let config = make_config("[strategy]\nkind = rsi\nperiod = 14\nlevel = 100\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "level"));

        let config = make_config("[strategy]\nkind = rsi\nlevel = 30\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn unknown_average_fails() {
        let config = make_config("[strategy]\nkind = ma_cross\naverage = hull\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "average"));
    }

    #[test]
    fn odd_window_fails() {
        let config = make_config("[strategy]\nwindow = 3\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, TradestatError::ConfigInvalid { key, .. } if key == "window"));
    }
}
