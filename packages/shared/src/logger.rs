//! Logging setup utilities for the codesync binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default filter covers the workspace crates and the binary itself,
/// plus `tower_http` at `info` so request traces show up without drowning
/// everything else. `RUST_LOG` overrides the whole filter when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "codesync-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use codesync_shared::logger::setup_logger;
///
/// setup_logger("codesync-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "codesync_server={level},codesync_shared={level},{bin}={level},tower_http=info",
                    level = default_log_level,
                    bin = binary_name.replace("-", "_"),
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
