//! Logging setup emitting JSON lines.
//!
//! Stdout carries the structured response to the caller, so every log line
//! goes to stderr.

use tracing_subscriber::EnvFilter;

use super::config::AppCfg;

/// Install the global JSON subscriber. `RUST_LOG` wins over `cfg.log_level`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(cfg: &AppCfg) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.as_str()));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .try_init();
}

/// Milliseconds elapsed since `start`, for the `dur_ms` log field.
pub fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
