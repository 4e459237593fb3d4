use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` selects levels (default `info`). `RECARGA_LOG_FORMAT=json`
/// switches to one JSON object per line. Output goes to stderr so the
/// dashboard text on stdout stays readable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("RECARGA_LOG_FORMAT").is_ok_and(|value| value == "json");

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json { builder.json().try_init() } else { builder.try_init() };
    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a dashboard command with structured fields.
///
/// `command` should be a stable identifier such as `"navigation::next"`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}
