//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: `level` for the orbis crates, `warn`
/// for everything else.
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!(
        "warn,orbis={level},orbis_core={level},orbis_sources={level},orbis_store={level},orbis_server={level},tower_http={level}"
    )
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `level`.
///
/// Calling it twice is harmless; the second call leaves the first subscriber in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
