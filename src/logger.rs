//!
//! Console logging for simulation runs.
//!
//! The crate instruments message transit, drops and application lifecycle
//! transitions via [`tracing`]. This module wires those events to stderr;
//! verbosity is controlled through `RUST_LOG` (e.g.
//! `RUST_LOG=linksim=trace`), falling back to `info`.
//!

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber, ignoring the error if one is already
/// installed (useful in test binaries where several cases race to set it).
pub fn init() {
    let _ = try_init();
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
}
