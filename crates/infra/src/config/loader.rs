//! Configuration loader
//!
//! Loads dashboard configuration from environment variables or files, and
//! resolves the PostgreSQL connection from the standard libpq variables.
//!
//! ## Loading Strategy
//! 1. `RECARGA_CONFIG` names an explicit file: load it
//! 2. `RECARGA_DATA_SOURCE` is set: load from environment variables
//! 3. Otherwise probe for `recarga.toml` / `recarga.json`
//! 4. Nothing found: built-in defaults
//!
//! ## Environment Variables
//! - `RECARGA_DATA_SOURCE`: `postgres` or `sample`
//! - `RECARGA_ENTITY_COUNTS_TTL_SECONDS`: entity count cache TTL
//! - `RECARGA_WINDOW_CACHE_CAPACITY`: entries per windowed dataset cache
//! - `RECARGA_EXPORT_DIR`: directory exported PDFs are written to
//! - `RECARGA_WINDOW_START` / `RECARGA_WINDOW_END`: start-up window (`YYYY-MM-DD`)
//! - `RECARGA_SAMPLE_SEED`: seed of the sample data source
//! - `RECARGA_SAMPLE_END_DATE`: last day of sample history (`YYYY-MM-DD`)
//!
//! ## Database Variables
//! `PGHOST`, `PGPORT` (default 5432), `PGUSER`, `PGPASSWORD`, `PGDATABASE`
//! are preferred when the four required ones are all set; `DATABASE_URL`
//! otherwise. `PGSSLMODE` of `require`, `verify-ca` or `verify-full` enables
//! TLS.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use recarga_domain::{
    DashboardConfig, DashboardError, DataSourceMode, DatabaseConfig, DateWindow, PgParams,
    Result, SampleConfig, SslMode,
};

const DEFAULT_PG_PORT: u16 = 5432;

/// Load dashboard configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DashboardError::Configuration` if an explicitly selected source
/// (environment or file) is present but invalid.
pub fn load() -> Result<DashboardConfig> {
    if let Ok(path) = std::env::var("RECARGA_CONFIG") {
        return load_from_file(Some(PathBuf::from(path)));
    }

    if let Some(config) = load_from_env()? {
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration file found, using defaults");
            Ok(DashboardConfig::default())
        }
    }
}

/// Load dashboard configuration from `RECARGA_*` environment variables
///
/// Returns `Ok(None)` when `RECARGA_DATA_SOURCE` is not set. Every other
/// variable is optional and falls back to its default.
///
/// # Errors
/// Returns `DashboardError::Configuration` for unparsable values.
pub fn load_from_env() -> Result<Option<DashboardConfig>> {
    let Ok(mode) = std::env::var("RECARGA_DATA_SOURCE") else {
        return Ok(None);
    };
    let defaults = DashboardConfig::default();

    let data_source = match mode.trim().to_ascii_lowercase().as_str() {
        "postgres" => DataSourceMode::Postgres,
        "sample" => DataSourceMode::Sample,
        other => {
            return Err(DashboardError::Configuration(format!(
                "Invalid RECARGA_DATA_SOURCE: {other} (expected postgres or sample)"
            )))
        }
    };

    let default_window = match (
        env_parse::<NaiveDate>("RECARGA_WINDOW_START")?,
        env_parse::<NaiveDate>("RECARGA_WINDOW_END")?,
    ) {
        (Some(start), Some(end)) => Some(DateWindow::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(DashboardError::Configuration(
                "RECARGA_WINDOW_START and RECARGA_WINDOW_END must be set together".into(),
            ))
        }
    };

    Ok(Some(DashboardConfig {
        data_source,
        entity_counts_ttl_seconds: env_parse("RECARGA_ENTITY_COUNTS_TTL_SECONDS")?
            .unwrap_or(defaults.entity_counts_ttl_seconds),
        window_cache_capacity: env_parse("RECARGA_WINDOW_CACHE_CAPACITY")?
            .unwrap_or(defaults.window_cache_capacity),
        export_dir: std::env::var("RECARGA_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir),
        default_window,
        sample: SampleConfig {
            seed: env_parse("RECARGA_SAMPLE_SEED")?.unwrap_or(defaults.sample.seed),
            end_date: env_parse("RECARGA_SAMPLE_END_DATE")?,
        },
    }))
}

/// Load dashboard configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and
/// TOML, detected by file extension.
///
/// # Errors
/// Returns `DashboardError::Configuration` if the file is missing, cannot be
/// read, or does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<DashboardConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DashboardError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DashboardError::Configuration(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DashboardError::Configuration(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<DashboardConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DashboardError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DashboardError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(DashboardError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the working directory, its parent and the executable's directory
/// for `recarga.toml` or `recarga.json`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.into_iter()
        .flat_map(|dir| [dir.join("recarga.toml"), dir.join("recarga.json")])
        .find(|path| path.exists())
}

/// Resolve PostgreSQL connection settings from the process environment
///
/// # Errors
/// Returns `DashboardError::Configuration` when neither the discrete
/// variables nor `DATABASE_URL` are available, or a value is invalid.
pub fn load_database_config() -> Result<DatabaseConfig> {
    resolve_database_config(|key| std::env::var(key).ok())
}

fn resolve_database_config(lookup: impl Fn(&str) -> Option<String>) -> Result<DatabaseConfig> {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let ssl_mode = parse_ssl_mode(non_empty("PGSSLMODE").as_deref())?;

    if let (Some(host), Some(user), Some(password), Some(dbname)) = (
        non_empty("PGHOST"),
        non_empty("PGUSER"),
        non_empty("PGPASSWORD"),
        non_empty("PGDATABASE"),
    ) {
        let port = match non_empty("PGPORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                DashboardError::Configuration(format!("Invalid PGPORT '{raw}': {e}"))
            })?,
            None => DEFAULT_PG_PORT,
        };
        tracing::debug!(host = %host, port, dbname = %dbname, "Using discrete PG* connection settings");
        return Ok(DatabaseConfig::Discrete(PgParams {
            host,
            port,
            user,
            password,
            dbname,
            ssl_mode,
        }));
    }

    if let Some(url) = non_empty("DATABASE_URL") {
        tracing::debug!("Using DATABASE_URL connection string");
        return Ok(DatabaseConfig::Url { url, ssl_mode });
    }

    Err(DashboardError::Configuration(
        "Missing PostgreSQL credentials: set PGHOST/PGUSER/PGPASSWORD/PGDATABASE \
         (and optionally PGPORT) or DATABASE_URL"
            .into(),
    ))
}

fn parse_ssl_mode(raw: Option<&str>) -> Result<SslMode> {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(SslMode::Disable),
        Some(mode) => match mode.as_str() {
            "disable" | "allow" | "prefer" => Ok(SslMode::Disable),
            "require" | "verify-ca" | "verify-full" => Ok(SslMode::Require),
            other => Err(DashboardError::Configuration(format!("Invalid PGSSLMODE: {other}"))),
        },
    }
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `DashboardError::Configuration` if the variable is set but does
/// not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DashboardError::Configuration(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
