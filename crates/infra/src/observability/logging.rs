//! Tracing subscriber installation
//!
//! `RUST_LOG` wins over the configured level. Output is human-readable by
//! default and one JSON object per line when `logging.json` is set.

use fz152_domain::{Fz152Error, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install the global subscriber
///
/// # Errors
/// Returns `Fz152Error::Config` for an unparsable level directive and
/// `Fz152Error::Internal` when a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let fmt_layer = if config.json {
        fmt::layer().json().with_target(true).with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(true).with_line_number(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Fz152Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| Fz152Error::Config(format!("logging.level: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `init_tracing` behavior for the repeated installation
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures a second installation is reported, not ignored.
    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(Fz152Error::Internal(_))));
    }

    #[test]
    fn test_filter_from_level() {
        assert!(build_filter("fz152=debug,info").is_ok());
    }
}
