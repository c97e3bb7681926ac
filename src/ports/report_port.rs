//! Report output port trait.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::TradestatError;
use std::path::Path;

/// Port for persisting analysis results.
pub trait ReportPort {
    /// One row per symbol with its statistics.
    fn write_summary(&self, report: &AnalysisReport, path: &Path) -> Result<(), TradestatError>;

    /// One row per completed trade across every symbol.
    fn write_trades(&self, report: &AnalysisReport, path: &Path) -> Result<(), TradestatError>;
}
