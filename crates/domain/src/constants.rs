//! Dashboard-wide constants

use std::time::Duration;

/// Interval between auto-rotated reports. Single process-wide value.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(15);

/// Default time-to-live for the live entity-count snapshot.
pub const DEFAULT_ENTITY_COUNTS_TTL_SECONDS: u64 = 300;

/// Default number of distinct date windows kept per dataset cache.
pub const DEFAULT_WINDOW_CACHE_CAPACITY: u64 = 64;

/// Default size of the performance rankings.
pub const DEFAULT_TOP_N: usize = 5;

/// MIME type of the consolidated export.
pub const EXPORT_MIME_TYPE: &str = "application/pdf";

/// Filename prefix of the consolidated export; the date stamp and extension
/// are appended.
pub const EXPORT_FILENAME_PREFIX: &str = "relatorio_rede_recarga_";

/// Shown in place of any report or export section without data.
pub const EMPTY_PERIOD_MESSAGE: &str = "Sem dados para o período selecionado.";
