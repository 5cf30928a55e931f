//! Structured logging setup.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `observability.log_level` when set.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (json, pretty) = match config.log_format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
}
