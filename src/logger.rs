//! Process-wide tracing setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured `log_level` applies to
//! every target. Output goes to stderr.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber. Call once, after config is resolved.
pub fn init(level: &str) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn filter_for(level: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::builder()
        .with_default_directive(parse_level(level)?.into())
        .from_env()
        .map_err(|e| AppError::Logger(format!("invalid RUST_LOG: {e}")))
}

/// Parse a bare level name (`error` … `trace`, or `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    match level.trim() {
        "" => Err(AppError::Logger("log level must not be empty".into())),
        name => name
            .parse::<LevelFilter>()
            .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'"))),
    }
}
