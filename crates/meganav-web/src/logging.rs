#![forbid(unsafe_code)]

//! JSON log output for embedded sessions.
//!
//! Installs a global `tracing-subscriber` formatter writing one JSON object
//! per event. Filtering follows `MEGANAV_LOG` using `EnvFilter` directive
//! syntax (`meganav_widgets=debug,meganav_web=trace`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "MEGANAV_LOG";

/// Directives used when `MEGANAV_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "meganav_widgets=info,meganav_web=info";

/// Build the filter from `MEGANAV_LOG`, falling back to [`DEFAULT_DIRECTIVES`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the JSON subscriber as the global default.
///
/// Returns `false` when a global subscriber is already set; the existing one
/// is left in place.
pub fn install_json_subscriber() -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}
