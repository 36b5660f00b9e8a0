//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured filter so a single run can
//! be made noisier without touching config files.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wildwelcome_domain::constants::DEFAULT_LOG_FILTER;
use wildwelcome_domain::LoggingConfig;

/// Install the global tracing subscriber
///
/// Returns `false` when a subscriber was already installed, so calling this
/// more than once (e.g. from several tests) is harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);

    let installed = if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false);
        tracing_subscriber::registry().with(filter).with(fmt_layer).try_init().is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        tracing_subscriber::registry().with(filter).with(fmt_layer).try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "Tracing initialised");
    }
    installed
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }

    #[test]
    fn invalid_filter_falls_back_to_default() {
        let config = LoggingConfig { filter: "wildwelcome=[".to_string(), json: false };
        // Must not panic
        let _ = build_filter(&config);
    }
}
