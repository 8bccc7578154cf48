//! Tracing subscriber setup. JSON lines by default, plain text on request.

use tracing_subscriber::EnvFilter;

use super::config::LogFormat;

/// Install the global subscriber. Returns `false` if one was already set,
/// which happens when tests initialise logging more than once.
pub fn init(filter: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Json => builder.json().flatten_event(true).try_init().is_ok(),
        LogFormat::Text => builder.try_init().is_ok(),
    }
}
