//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "SPENDCAT_LOG";

/// Filter used when `SPENDCAT_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "spendcat=info";

/// Initialize the spendcat tracing/logging system.
///
/// Reads `SPENDCAT_LOG` for per-crate log levels.
/// Format: `SPENDCAT_LOG=spendcat_model=debug,spendcat_storage=warn`
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host process may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init();
    });
}
