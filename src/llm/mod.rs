//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities; clone them freely.
//! Enum dispatch keeps `complete` an `async fn` without trait objects.

pub mod providers;

use std::time::Duration;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Why a provider call produced no answer.
///
/// The fallback chain treats every kind the same way (advance to the next
/// tier); the kinds exist for logs and error messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider setup failed: {0}")]
    Setup(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum LlmProvider {
    OpenAi(providers::openai_compatible::OpenAiCompatibleProvider),
    HuggingFace(providers::huggingface::HuggingFaceProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl LlmProvider {
    /// Send `prompt` to the provider and return its text reply.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::OpenAi(p) => p.complete(prompt).await,
            LlmProvider::HuggingFace(p) => p.complete(prompt).await,
            LlmProvider::Dummy(p) => p.complete(prompt).await,
        }
    }

    /// Stable short name, used as the answer's provenance tag.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi(_) => "openai",
            LlmProvider::HuggingFace(_) => "huggingface",
            LlmProvider::Dummy(_) => "dummy",
        }
    }

    /// Upper bound for one `complete` call.
    pub fn timeout(&self) -> Duration {
        match self {
            LlmProvider::OpenAi(p) => p.timeout(),
            LlmProvider::HuggingFace(p) => p.timeout(),
            LlmProvider::Dummy(p) => p.timeout(),
        }
    }
}
