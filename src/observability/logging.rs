//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate; the library only emits events, binaries install the subscriber
//! - `RUST_LOG` wins over the configured level
//! - JSON format for machine parsing, pretty format otherwise

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when neither `RUST_LOG` nor the config says otherwise.
pub const DEFAULT_FILTER: &str = "netresponse=info";

/// Build the env filter: `RUST_LOG` first, then `netresponse=<log_level>`.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if config.log_level.is_empty() {
            DEFAULT_FILTER.to_string()
        } else {
            format!("netresponse={}", config.log_level)
        };
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
