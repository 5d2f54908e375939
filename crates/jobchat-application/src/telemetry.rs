//! Tracing subscriber setup for hosts embedding the widget.

use tracing_subscriber::EnvFilter;

/// Libraries whose debug output drowns the widget's own events.
pub const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Builds the filter: `RUST_LOG` wins, otherwise `default_filter` with the
/// HTTP stack capped at `warn`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = default_filter.to_string();
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a global fmt subscriber.
///
/// Fails when a global subscriber is already set, which hosts may ignore.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_filter))
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
