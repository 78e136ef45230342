//! Structured logging init, following this codebase's `init_tracing` helper.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a global [`tracing`] subscriber once per process.
///
/// Safe to call multiple times (e.g. once per test) — only the first call
/// takes effect. Honors `RUST_LOG` via [`tracing_subscriber::EnvFilter`],
/// falling back to `info` when unset.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    });
}
