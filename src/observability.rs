//! Observability and telemetry.
//!
//! Tracing goes to stderr with an `EnvFilter`; `RUST_LOG` overrides the
//! verbosity chosen on the command line. Metrics are emitted through the
//! `metrics` macros and are a no-op unless the host process installs a
//! recorder.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Options for environment-based initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Whether verbose output was requested via CLI.
    pub verbose: bool,
}

/// Initializes the tracing subscriber once per process.
///
/// Later calls are no-ops, so tests and embedding hosts can call this
/// freely.
pub fn init(options: InitOptions) {
    INIT.get_or_init(|| {
        let default_directive = if options.verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
