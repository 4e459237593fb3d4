//! Configuration structures
//!
//! Loading lives in the infra crate; these types only describe the resolved
//! settings. Secrets are redacted from `Debug` output.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENTITY_COUNTS_TTL_SECONDS, DEFAULT_WINDOW_CACHE_CAPACITY};
use crate::DateWindow;

/* -------------------------------------------------------------------------- */
/* Database */
/* -------------------------------------------------------------------------- */

/// Whether the PostgreSQL connection must be encrypted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslMode {
    #[default]
    Disable,
    Require,
}

/// Discrete PostgreSQL connection parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    #[serde(default)]
    pub ssl_mode: SslMode,
}

impl fmt::Debug for PgParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Resolved database connection settings.
///
/// Discrete parameters win over a connection URL when both are present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseConfig {
    Discrete(PgParams),
    Url { url: String, ssl_mode: SslMode },
}

impl DatabaseConfig {
    pub fn ssl_mode(&self) -> SslMode {
        match self {
            Self::Discrete(params) => params.ssl_mode,
            Self::Url { ssl_mode, .. } => *ssl_mode,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete(params) => f.debug_tuple("Discrete").field(params).finish(),
            Self::Url { ssl_mode, .. } => f
                .debug_struct("Url")
                .field("url", &"<redacted>")
                .field("ssl_mode", ssl_mode)
                .finish(),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Dashboard */
/* -------------------------------------------------------------------------- */

/// Where report datasets come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceMode {
    #[default]
    Postgres,
    /// Seeded, in-process sample datasets.
    Sample,
}

/// Settings of the seeded sample data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    #[serde(default = "default_sample_seed")]
    pub seed: u64,
    /// Last day of generated history; today when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { seed: default_sample_seed(), end_date: None }
    }
}

fn default_sample_seed() -> u64 {
    42
}

/// Dashboard runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data_source: DataSourceMode,
    #[serde(default = "default_entity_counts_ttl")]
    pub entity_counts_ttl_seconds: u64,
    #[serde(default = "default_window_cache_capacity")]
    pub window_cache_capacity: u64,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Window shown at start-up; month-to-date when absent.
    #[serde(default)]
    pub default_window: Option<DateWindow>,
    #[serde(default)]
    pub sample: SampleConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceMode::default(),
            entity_counts_ttl_seconds: default_entity_counts_ttl(),
            window_cache_capacity: default_window_cache_capacity(),
            export_dir: default_export_dir(),
            default_window: None,
            sample: SampleConfig::default(),
        }
    }
}

fn default_entity_counts_ttl() -> u64 {
    DEFAULT_ENTITY_COUNTS_TTL_SECONDS
}

fn default_window_cache_capacity() -> u64 {
    DEFAULT_WINDOW_CACHE_CAPACITY
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
