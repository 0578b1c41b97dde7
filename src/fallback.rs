//! Fallback chain — decides which source answers a query.
//!
//! ```text
//! TryGraph ─► TryProvider[0] ─► TryProvider[1] ─► Exhausted
//! ```
//!
//! The graph tier runs only when graph mode is on and a snapshot is loaded.
//! Provider tiers are the providers built from config, in priority order
//! (OpenAI, then Hugging Face); a provider without a credential is simply not
//! in the list. Each provider call runs under its own timeout. Any provider
//! failure is logged and the chain moves on; only an empty query or an
//! exhausted chain is reported to the caller.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::graph::GraphHandle;
use crate::graph::engine::{QueryEngine, QueryOutcome};
use crate::llm::{LlmProvider, ProviderError};

// ── Results ───────────────────────────────────────────────────────────────────

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    KnowledgeGraph,
    /// Provider short name, see [`LlmProvider::name`].
    Provider(&'static str),
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Provenance::KnowledgeGraph => "knowledge_graph",
            Provenance::Provider(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub provenance: Provenance,
}

impl Answer {
    /// The answer as shown to the user, introduced by where it came from.
    pub fn display_text(&self) -> String {
        match self.provenance {
            Provenance::KnowledgeGraph => {
                format!("I found this in the knowledge graph:\n{}", self.text)
            }
            Provenance::Provider("openai") => format!(
                "Information wasn't available in knowledge graph, but here's what I found in OpenAI:\n{}",
                self.text
            ),
            Provenance::Provider("huggingface") => format!(
                "Wasn't available in knowledge graph or OpenAI, but found this on the internet: {}",
                self.text
            ),
            Provenance::Provider(name) => format!("Answer from {name}:\n{}", self.text),
        }
    }
}

/// One provider tier that failed while the chain was walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub provider: &'static str,
    pub error: ProviderError,
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.provider, self.error)
    }
}

/// Outcomes reported to the caller. Everything else is recovered inside a tier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Empty query")]
    EmptyQuery,
    /// No tier was available to try.
    #[error("No valid data source available.")]
    NoDataSource,
    /// Every configured provider was tried and failed.
    #[error("{}", join_failures(.0))]
    ProvidersFailed(Vec<TierFailure>),
}

impl QueryError {
    /// `true` for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::EmptyQuery)
    }
}

fn join_failures(failures: &[TierFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Read-only view of which sources are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SourceStatus {
    pub graph_mode_enabled: bool,
    pub graph_loaded: bool,
    pub openai_key_present: bool,
    pub hf_key_present: bool,
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Shared by all request handlers; cheap to clone.
#[derive(Debug, Clone)]
pub struct FallbackController {
    graph_mode: bool,
    graph: GraphHandle,
    providers: Vec<LlmProvider>,
}

impl FallbackController {
    pub fn new(graph_mode: bool, graph: GraphHandle, providers: Vec<LlmProvider>) -> Self {
        Self { graph_mode, graph, providers }
    }

    pub fn graph(&self) -> &GraphHandle {
        &self.graph
    }

    pub async fn status(&self) -> SourceStatus {
        let has = |name: &str| self.providers.iter().any(|p| p.name() == name);
        SourceStatus {
            graph_mode_enabled: self.graph_mode,
            graph_loaded: self.graph.is_loaded().await,
            openai_key_present: has("openai"),
            hf_key_present: has("huggingface"),
        }
    }

    /// Walk the chain for one query.
    pub async fn answer(&self, query: &str) -> Result<Answer, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        if let Some(text) = self.try_graph(query).await {
            info!(source = "knowledge_graph", "query answered");
            return Ok(Answer { text, provenance: Provenance::KnowledgeGraph });
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            let name = provider.name();
            let timeout = provider.timeout();
            let result = match tokio::time::timeout(timeout, provider.complete(query)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(timeout)),
            };
            match result {
                Ok(text) => {
                    info!(source = name, "query answered");
                    return Ok(Answer { text, provenance: Provenance::Provider(name) });
                }
                Err(error) => {
                    warn!(provider = name, %error, "provider unavailable, trying next tier");
                    failures.push(TierFailure { provider: name, error });
                }
            }
        }

        if failures.is_empty() {
            warn!("no data source available");
            Err(QueryError::NoDataSource)
        } else {
            Err(QueryError::ProvidersFailed(failures))
        }
    }

    async fn try_graph(&self, query: &str) -> Option<String> {
        if !self.graph_mode {
            return None;
        }
        let Some(graph) = self.graph.snapshot().await else {
            debug!("graph tier skipped: graph not loaded");
            return None;
        };
        match QueryEngine::new(graph).answer(query) {
            QueryOutcome::Answered(text) => Some(text),
            QueryOutcome::NotFound => {
                debug!("graph tier found no answer");
                None
            }
        }
    }
}
