//! LLM provider implementations.
//!
//! [`build_chain`] is the factory, called once at startup. It returns the
//! configured providers in fallback order; a provider without a credential is
//! left out entirely.

pub mod dummy;
pub mod huggingface;
pub mod openai_compatible;

use reqwest::StatusCode;

use crate::config::Config;
use crate::llm::{LlmProvider, ProviderError};

/// Providers in priority order: OpenAI first, then Hugging Face.
pub fn build_chain(config: &Config) -> Result<Vec<LlmProvider>, ProviderError> {
    let mut chain = Vec::new();

    if let Some(key) = &config.openai_api_key {
        let oai = &config.providers.openai;
        let p = openai_compatible::OpenAiCompatibleProvider::new(
            oai.api_base_url.clone(),
            oai.model.clone(),
            oai.temperature,
            oai.timeout_seconds,
            Some(key.clone()),
        )?;
        chain.push(LlmProvider::OpenAi(p));
    }

    if let Some(key) = &config.hf_api_key {
        let hf = &config.providers.huggingface;
        let p = huggingface::HuggingFaceProvider::new(
            hf.api_base_url.clone(),
            hf.model.clone(),
            hf.timeout_seconds,
            key.clone(),
        )?;
        chain.push(LlmProvider::HuggingFace(p));
    }

    Ok(chain)
}

/// Map a non-success HTTP status and its message to an error kind.
pub(crate) fn status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        _ => ProviderError::Status { status: status.as_u16(), message },
    }
}

/// Map a transport-level reqwest failure.
pub(crate) fn transport_error(e: reqwest::Error, timeout: std::time::Duration) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Network(e.to_string())
    }
}
