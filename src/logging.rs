//! Structured logging via `tracing`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (from config or CLI) is used,
/// falling back to [`DEFAULT_FILTER`] when empty. Calling this twice is
/// harmless: the second install is ignored.
pub fn init_logging(level: &str) {
    let filter_str = if level.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        level
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
