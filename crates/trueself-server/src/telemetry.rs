//! Tracing subscriber bootstrap

use trueself_core::ServerConfig;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. JSON lines are
/// emitted when `json_logs` is set.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_telemetry(config: &ServerConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = if config.json_logs {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(
        target: "telemetry",
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "telemetry initialized"
    );
    Ok(())
}
