use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the tracing subscriber on stdout in the given format.
/// - `json` emits one JSON object per event and, by default, debug events
///   from the store (one per persisted write)
/// - anything else emits compact human-readable lines
/// - `RUST_LOG` overrides the default filter in both cases
/// - a second call is a no-op
pub fn init_logging(format: &str) {
    let json = format.eq_ignore_ascii_case("json");
    let fallback = if json { "info,store=debug" } else { "info,tower_http=info,axum=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);
    let _ = if json { builder.json().try_init() } else { builder.compact().try_init() };
}

/// Compact output, used before the configuration is known.
pub fn init_logging_default() {
    init_logging("compact");
}
