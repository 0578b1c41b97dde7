//! Hugging Face inference provider.
//!
//! Posts `{"inputs": prompt}` to `{api_base_url}/{model}` with bearer auth.
//! Text-generation models answer `[{"generated_text": "..."}]`; other task
//! types return differently shaped JSON, which is passed through as its JSON
//! text rather than rejected.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{status_error, transport_error};
use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    client: Client,
    endpoint: String,
    timeout: Duration,
    api_key: String,
}

impl HuggingFaceProvider {
    pub fn new(
        api_base_url: String,
        model: String,
        timeout_seconds: u64,
        api_key: String,
    ) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Setup(format!("failed to build HTTP client: {e}")))?;
        let endpoint = format!("{}/{}", api_base_url.trim_end_matches('/'), model);

        Ok(Self { client, endpoint, timeout, api_key })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "sending inference request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "inference request failed (transport)");
                transport_error(e, self.timeout)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Malformed(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceResponse>(&body)
                .ok()
                .and_then(|r| match r {
                    InferenceResponse::Error { error } => Some(error),
                    _ => None,
                })
                .unwrap_or(body);
            error!(%status, %message, "inference returned HTTP error");
            return Err(status_error(status, message));
        }

        parse_body(&body)
    }
}

fn parse_body(body: &str) -> Result<String, ProviderError> {
    let parsed: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("response is not JSON: {e}")))?;

    match parsed {
        InferenceResponse::Generated(items) => items
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| ProviderError::Malformed("empty generation list".into())),
        InferenceResponse::Error { error } => Err(ProviderError::Malformed(error)),
        InferenceResponse::Other(value) => Ok(value.to_string()),
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Response shapes the inference API is known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Generated(Vec<GeneratedText>),
    Error { error: String },
    Other(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let p = HuggingFaceProvider::new(
            "https://router.huggingface.co/hf-inference/models/".into(),
            "bigscience/bloomz-560m".into(),
            30,
            "hf_test".into(),
        )
        .unwrap();
        assert_eq!(
            p.endpoint,
            "https://router.huggingface.co/hf-inference/models/bigscience/bloomz-560m"
        );
        assert_eq!(p.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn generated_text_is_extracted() {
        let out = parse_body(r#"[{"generated_text": "CA-125 is a biomarker."}]"#).unwrap();
        assert_eq!(out, "CA-125 is a biomarker.");
    }

    #[test]
    fn other_shapes_pass_through_as_json() {
        let out = parse_body(r#"[{"label": "POSITIVE", "score": 0.9}]"#).unwrap();
        assert!(out.contains("POSITIVE"));
    }

    #[test]
    fn error_body_and_garbage_are_failures() {
        assert_eq!(
            parse_body(r#"{"error": "Model is loading"}"#),
            Err(ProviderError::Malformed("Model is loading".into()))
        );
        assert!(matches!(parse_body("<html>"), Err(ProviderError::Malformed(_))));
        assert!(matches!(parse_body("[]"), Err(ProviderError::Malformed(_))));
    }
}
