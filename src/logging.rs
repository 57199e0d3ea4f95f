//! Structured logging setup.
//!
//! Events go to stderr only; stdout carries the rendered panel or, in
//! `serve` mode, protocol traffic.

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directives, e.g. `info` or `structgraph::panel=debug`.
pub const ENV_LOG: &str = "STRUCTGRAPH_LOG";
/// Output format: `text` (default) or `json`.
pub const ENV_LOG_FORMAT: &str = "STRUCTGRAPH_LOG_FORMAT";

const DEFAULT_FILTER: &str = "warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything other than `json` is text.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Installs the global subscriber from `STRUCTGRAPH_LOG` and
/// `STRUCTGRAPH_LOG_FORMAT`.
///
/// Calling it again is harmless: a subscriber that is already installed
/// stays in place.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());
    let base = Registry::default().with(filter);

    let result = match format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}
