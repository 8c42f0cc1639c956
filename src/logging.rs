//! Diagnostic logging setup.
//!
//! Installs a `tracing` fmt subscriber writing to stderr. The filter comes
//! from `SLACKR_LOG` (same syntax as `RUST_LOG`) and defaults to info for
//! this crate only.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SLACKR_LOG";

const DEFAULT_FILTER: &str = "slackr_client=info";

/// Build the filter from the environment, falling back to the default
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init();
}
