//! Knowledge graph — typed nodes and directed relation edges held in memory.
//!
//! The graph is loaded once from a JSON document:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "Disease:ovarian_cancer", "label": "ovarian cancer", "type": "Disease" }],
//!   "edges": [{ "source": "Disease:ovarian_cancer", "target": "Gene:BRCA1", "type": "associated_with" }]
//! }
//! ```
//!
//! A loaded [`Graph`] is never mutated. [`GraphHandle`] owns the current
//! snapshot (or the reason there is none) and replaces it wholesale on reload,
//! so in-flight queries keep reading the snapshot they started with.
//!
//! # Module layout
//!
//! - **matcher** — case-insensitive label-in-query matching per node type.
//! - **relations** — the directional, type-filtered edge scan.
//! - **compose** — fixed answer sentence templates.
//! - **engine** — the per-query precedence walk producing an answer.

pub mod compose;
pub mod engine;
pub mod matcher;
pub mod relations;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use engine::NOT_FOUND_SENTINEL;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Why a graph source could not be loaded. Load is all-or-nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed graph document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("node {0} uses the reserved not-found text as its label")]
    ReservedLabel(String),
}

// ── Types ─────────────────────────────────────────────────────────────────────

/// Semantic category of a node. Unknown categories are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Disease,
    Gene,
    Protein,
    Biomarker,
    Drug,
    Treatment,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Disease => "Disease",
            NodeType::Gene => "Gene",
            NodeType::Protein => "Protein",
            NodeType::Biomarker => "Biomarker",
            NodeType::Drug => "Drug",
            NodeType::Treatment => "Treatment",
            NodeType::Other(s) => s,
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Disease" => NodeType::Disease,
            "Gene" => NodeType::Gene,
            "Protein" => NodeType::Protein,
            "Biomarker" => NodeType::Biomarker,
            "Drug" => NodeType::Drug,
            "Treatment" => NodeType::Treatment,
            _ => NodeType::Other(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed entity. Identity is `id`; `label` is what queries are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

/// A directed, typed relation. No symmetry is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Relation kind, e.g. `"encodes"` or `"biomarker_of"`.
    #[serde(rename = "type")]
    pub relation: String,
}

/// On-disk document shape. Both sequences are required.
#[derive(Deserialize)]
struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable in-memory graph. Nodes keep document order, which is the
/// iteration order every lookup by type follows.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Read and parse the graph document at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse a graph document held in memory.
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let doc: GraphDocument = serde_json::from_str(raw)?;
        Self::from_parts(doc.nodes, doc.edges)
    }

    /// Build a graph from already-parsed nodes and edges.
    ///
    /// Rejects duplicate ids and labels equal to the not-found sentinel.
    /// Edge endpoints are not checked here; see [`Graph::dangling_edge_count`].
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if node.label.eq_ignore_ascii_case(NOT_FOUND_SENTINEL) {
                return Err(LoadError::ReservedLabel(node.id.clone()));
            }
            if index.insert(node.id.clone(), pos).is_some() {
                return Err(LoadError::DuplicateNode(node.id.clone()));
            }
        }
        Ok(Self { nodes, index, edges })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Nodes of `node_type`, lazily, in document order.
    pub fn nodes_of_type<'a>(&'a self, node_type: &'a NodeType) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| &n.node_type == node_type)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges whose source or target names a node that does not exist.
    pub fn dangling_edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none())
            .count()
    }
}

// ── GraphHandle ───────────────────────────────────────────────────────────────

/// Current graph availability.
#[derive(Debug, Clone)]
pub enum GraphState {
    Loaded(Arc<Graph>),
    /// The last load failed; the message is kept for status reporting.
    Unavailable(String),
}

/// Shared owner of the graph snapshot.
///
/// Cheap to clone. The lock is held only long enough to clone or replace the
/// `Arc`; queries never hold it while traversing.
#[derive(Debug, Clone)]
pub struct GraphHandle {
    path: PathBuf,
    state: Arc<RwLock<GraphState>>,
}

impl GraphHandle {
    /// Load the graph at `path`. A failure is logged and recorded as
    /// [`GraphState::Unavailable`]; it never aborts startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match Graph::load(&path) {
            Ok(graph) => {
                log_loaded(&path, &graph);
                GraphState::Loaded(Arc::new(graph))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge graph unavailable");
                GraphState::Unavailable(e.to_string())
            }
        };
        Self { path, state: Arc::new(RwLock::new(state)) }
    }

    /// Wrap an already-built graph.
    pub fn from_graph(graph: Graph, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(RwLock::new(GraphState::Loaded(Arc::new(graph)))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current snapshot, or `None` while the graph is unavailable.
    pub async fn snapshot(&self) -> Option<Arc<Graph>> {
        match &*self.state.read().await {
            GraphState::Loaded(graph) => Some(graph.clone()),
            GraphState::Unavailable(_) => None,
        }
    }

    pub async fn state(&self) -> GraphState {
        self.state.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        matches!(*self.state.read().await, GraphState::Loaded(_))
    }

    /// Re-read the source and swap in the new snapshot.
    ///
    /// On failure the previous state is left untouched.
    pub async fn reload(&self) -> Result<Arc<Graph>, LoadError> {
        let path = self.path.clone();
        let graph = tokio::task::spawn_blocking(move || Graph::load(&path))
            .await
            .map_err(|e| LoadError::Io {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })??;

        log_loaded(&self.path, &graph);
        let graph = Arc::new(graph);
        *self.state.write().await = GraphState::Loaded(graph.clone());
        Ok(graph)
    }
}

fn log_loaded(path: &Path, graph: &Graph) {
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "knowledge graph loaded"
    );
    let dangling = graph.dangling_edge_count();
    if dangling > 0 {
        warn!(dangling, "knowledge graph has edges referencing unknown nodes");
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = r#"{
        "nodes": [
            {"id": "Disease:migraine_x", "label": "cluster headache", "type": "Disease"},
            {"id": "Gene:CACNA1A", "label": "CACNA1A", "type": "Gene"},
            {"id": "Pathway:p1", "label": "calcium signalling", "type": "Pathway", "extra": 1}
        ],
        "edges": [
            {"source": "Disease:migraine_x", "target": "Gene:CACNA1A", "type": "associated_with"}
        ]
    }"#;

    #[test]
    fn every_node_round_trips_by_id() {
        let graph = Graph::from_json(DOC).unwrap();
        for n in graph.nodes() {
            assert_eq!(graph.node(&n.id), Some(n));
        }
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.node("Gene:missing").is_none());
    }

    #[test]
    fn unknown_node_type_is_preserved() {
        let graph = Graph::from_json(DOC).unwrap();
        let pathway = graph.node("Pathway:p1").unwrap();
        assert_eq!(pathway.node_type, NodeType::Other("Pathway".into()));
        assert_eq!(pathway.node_type.to_string(), "Pathway");
    }

    #[test]
    fn nodes_of_type_keeps_document_order() {
        let graph = sample_graph();
        let diseases: Vec<_> = graph
            .nodes_of_type(&NodeType::Disease)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(diseases, ["Disease:ovarian_cancer", "Disease:breast_cancer"]);
    }

    #[test]
    fn missing_edges_key_is_a_parse_error() {
        let err = Graph::from_json(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn node_without_label_is_rejected() {
        let err = Graph::from_json(r#"{"nodes": [{"id": "a", "type": "Gene"}], "edges": []}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let nodes = vec![
            node("Gene:A", "A", NodeType::Gene),
            node("Gene:A", "A again", NodeType::Gene),
        ];
        let err = Graph::from_parts(nodes, vec![]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateNode(id) if id == "Gene:A"));
    }

    #[test]
    fn sentinel_label_is_reserved() {
        let nodes = vec![node("x", &NOT_FOUND_SENTINEL.to_uppercase(), NodeType::Disease)];
        assert!(matches!(
            Graph::from_parts(nodes, vec![]),
            Err(LoadError::ReservedLabel(_))
        ));
    }

    #[test]
    fn dangling_edges_are_counted_not_rejected() {
        let nodes = vec![node("Gene:A", "A", NodeType::Gene)];
        let edges = vec![edge("Gene:A", "Protein:gone", "encodes")];
        let graph = Graph::from_parts(nodes, edges).unwrap();
        assert_eq!(graph.dangling_edge_count(), 1);
    }

    #[test]
    fn unreadable_path_is_io_error() {
        let err = Graph::load(Path::new("/nonexistent/kg.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn handle_reports_unavailable_on_bad_source() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"nodes": []}"#).unwrap();
        let handle = GraphHandle::load(f.path());
        assert!(!handle.is_loaded().await);
        assert!(handle.snapshot().await.is_none());
        assert!(matches!(handle.state().await, GraphState::Unavailable(msg) if msg.contains("edges")));
    }

    #[tokio::test]
    async fn reload_swaps_snapshot_and_keeps_old_on_failure() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(DOC.as_bytes()).unwrap();
        let handle = GraphHandle::load(f.path());
        let before = handle.snapshot().await.unwrap();
        assert_eq!(before.node_count(), 3);

        std::fs::write(f.path(), r#"{"nodes": [], "edges": []}"#).unwrap();
        let after = handle.reload().await.unwrap();
        assert_eq!(after.node_count(), 0);
        // A snapshot taken earlier is unaffected by the swap.
        assert_eq!(before.node_count(), 3);

        std::fs::write(f.path(), "not json").unwrap();
        assert!(handle.reload().await.is_err());
        assert_eq!(handle.snapshot().await.unwrap().node_count(), 0);
    }
}
