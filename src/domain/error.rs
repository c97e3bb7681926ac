//! Domain error types.

/// Top-level error type for tradestat.
#[derive(Debug, thiserror::Error)]
pub enum TradestatError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error("insufficient data for {code} on {exchange}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        exchange: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bars for {code} are not strictly ascending by date at index {index}")]
    UnorderedSeries { code: String, index: usize },

    #[error("signal window size must be even and at least 2, got {size}")]
    InvalidWindow { size: usize },

    #[error("malformed trade sequence: {reason}")]
    MalformedTrades { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradestatError> for std::process::ExitCode {
    fn from(err: &TradestatError) -> Self {
        let code: u8 = match err {
            TradestatError::Io(_) => 1,
            TradestatError::ConfigParse { .. }
            | TradestatError::ConfigMissing { .. }
            | TradestatError::ConfigInvalid { .. } => 2,
            TradestatError::Database { .. } | TradestatError::DatabaseQuery { .. } => 3,
            TradestatError::UnorderedSeries { .. }
            | TradestatError::InvalidWindow { .. }
            | TradestatError::MalformedTrades { .. } => 4,
            TradestatError::NoData { .. } | TradestatError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
