//! Logging initialization for quictun.
//!
//! The severity filter sits behind a reload layer so it can be adjusted at
//! runtime through the admin interface without restarting the tunnel.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Fallback filter when the configured level fails to parse.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Handle to the installed severity filter.
#[derive(Clone)]
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Returns the current filter directive string.
    pub fn current(&self) -> String {
        self.handle
            .with_current(|filter| filter.to_string())
            .unwrap_or_default()
    }

    /// Replaces the filter with the given directive string.
    pub fn set(&self, spec: &str) -> std::result::Result<(), String> {
        let filter = parse_filter(spec)?;
        self.handle.reload(filter).map_err(|e| e.to_string())
    }
}

/// Parses a filter directive string into an `EnvFilter`.
pub fn parse_filter(spec: &str) -> std::result::Result<EnvFilter, String> {
    EnvFilter::try_new(spec).map_err(|e| e.to_string())
}

pub(crate) fn reload_filter(level: &str) -> (reload::Layer<EnvFilter, Registry>, LogHandle) {
    let filter = parse_filter(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let (layer, handle) = reload::Layer::new(filter);
    (layer, LogHandle { handle })
}

/// Installs the global subscriber, writing to stderr, and returns the
/// handle used for runtime level adjustment.
pub fn init(level: &str) -> LogHandle {
    let (filter, handle) = reload_filter(level);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}
