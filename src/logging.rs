//! logging
//!
//! Diagnostic logging with `tracing`.
//!
//! Diagnostics go to stderr so they never mix with report output or JSON on
//! stdout. The filter comes from `VIDAR_LOG` (same syntax as `RUST_LOG`),
//! defaulting to `warn`. `--debug` additionally enables `debug` for this crate.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "VIDAR_LOG";

/// Default filter when `VIDAR_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Build the log filter.
pub fn filter(env_value: Option<&str>, debug: bool) -> EnvFilter {
    let mut filter = env_value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    if debug {
        if let Ok(directive) = "vidar=debug".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the global subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(debug: bool) {
    let env_value = std::env::var(ENV_LOG).ok();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();

    let _ = Registry::default()
        .with(filter(env_value.as_deref(), debug))
        .with(layer)
        .try_init();
}
