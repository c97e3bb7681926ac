//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod ohlcv;
pub mod series;
pub mod signal;
pub mod strategy;
pub mod trade;
pub mod trade_stats;
pub mod universe;
