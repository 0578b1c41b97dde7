//! Application-wide error types.
//!
//! Layer-specific errors live next to their layer: [`crate::graph::LoadError`],
//! [`crate::llm::ProviderError`] and [`crate::fallback::QueryError`].
//! `AppError` covers process bootstrap only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
