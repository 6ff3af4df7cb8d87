//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem
//! - Configure log level via environment (`RUST_LOG`)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Level defaults to `stellarpulse=info` and can be overridden with the
/// standard `RUST_LOG` environment variable.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stellarpulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
