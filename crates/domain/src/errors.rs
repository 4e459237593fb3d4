//! Error types used throughout the dashboard

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the dashboard
///
/// An empty dataset is never an error: aggregations and export sections
/// report it as an explicit empty state instead.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DashboardError {
    /// Missing or incomplete connection credentials. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Query failure or an empty required result.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// The requested date window starts after it ends.
    #[error("Invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// Navigation by a report name the catalog does not contain.
    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::DataSource(_) => "data_source",
            Self::InvalidWindow { .. } => "invalid_window",
            Self::UnknownReport(_) => "unknown_report",
            Self::Render(_) => "render",
            Self::Export(_) => "export",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
