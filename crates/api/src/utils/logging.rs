//! Tracing setup for the binary

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,timesync=debug";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. Setting `TIMESYNC_LOG_JSON` to a
/// truthy value switches to JSON lines. Calling this twice is harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if json_requested() {
        tracing_subscriber::fmt().with_env_filter(filter).json().with_current_span(false).try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn json_requested() -> bool {
    std::env::var("TIMESYNC_LOG_JSON")
        .map(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
