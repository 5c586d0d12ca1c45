//! Tracing subscriber installation for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, Settings};

/// Builds the log filter.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used, and an
/// unparsable level falls back to `info`.
#[must_use]
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_ascii_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber described by `settings`.
///
/// Returns `false` when logging is disabled or a subscriber is already set.
pub fn init_tracing(settings: &Settings) -> bool {
    if !settings.enable_logging {
        return false;
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(&settings.log_level))
        .with_writer(std::io::stderr)
        .with_target(false);

    match settings.log_format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.try_init().is_ok(),
    }
}
