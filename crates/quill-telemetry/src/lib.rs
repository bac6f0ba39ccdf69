//! Logging setup for quill
//!
//! Installs a `tracing-subscriber` registry writing to stderr so that the
//! completion itself can own stdout.

use quill_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// `RUST_LOG` takes precedence over the configured filter, which in turn
/// takes precedence over `default_filter`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let filter = build_filter(config, default_filter);
    let format = config.map_or(LogFormat::Pretty, |c| c.format);

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Pick the effective filter directive
fn build_filter(config: Option<&TelemetryConfig>, default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directive = config.map_or(default_filter, |c| c.filter.as_str());
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}
