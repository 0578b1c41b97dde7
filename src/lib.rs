//! HerLens — answers biomedical questions from a small typed knowledge graph,
//! falling back to external LLM providers when the graph has no answer.
//!
//! - **graph** — graph store, entity matching, relation resolution, answer
//!   templates and the query engine.
//! - **fallback** — the ordered graph → provider chain.
//! - **llm** — provider clients behind one `complete` contract.
//! - **http** — axum API (`http` feature).
//! - **config**, **logger**, **error** — process bootstrap.

pub mod config;
pub mod error;
pub mod fallback;
pub mod graph;
pub mod llm;
pub mod logger;

#[cfg(feature = "http")]
pub mod http;
