//! Query engine — turns one free-text question into a graph answer.
//!
//! Entity types are tried in a fixed precedence order:
//!
//! ```text
//! Disease ─► Gene ─► Protein ─► Biomarker ─► Drug ─► Treatment ─► NotFound
//! ```
//!
//! A disease answers only when the query also names what is wanted ("gene",
//! "protein", "biomarker", "treatment"/"therapy", "drug"), checked in that
//! order. Every other type has exactly one relation to report. Within a type,
//! matching nodes are tried in graph order and the first non-empty relation
//! wins; if none yields one the walk falls through to the next type.
//!
//! The order is kept as-is for output compatibility. Changing it is a policy
//! decision, not a fix.

use std::sync::Arc;

use tracing::debug;

use super::compose::{RelationKind, compose};
use super::matcher::find_matches;
use super::relations::{RelationQuery, related_labels};
use super::{Graph, NodeType};

/// Text of a not-found result. Reserved: no node label may equal it.
pub const NOT_FOUND_SENTINEL: &str = "I couldn't find a direct answer in the knowledge graph.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered(String),
    NotFound,
}

impl QueryOutcome {
    /// The answer text, or [`NOT_FOUND_SENTINEL`].
    pub fn as_text(&self) -> &str {
        match self {
            QueryOutcome::Answered(text) => text,
            QueryOutcome::NotFound => NOT_FOUND_SENTINEL,
        }
    }
}

/// Relation hints found in the query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct QueryIntent {
    gene: bool,
    protein: bool,
    biomarker: bool,
    treatment: bool,
    drug: bool,
}

impl QueryIntent {
    fn from_folded(folded: &str) -> Self {
        Self {
            gene: folded.contains("gene"),
            protein: folded.contains("protein"),
            biomarker: folded.contains("biomarker"),
            treatment: folded.contains("treatment") || folded.contains("therapy"),
            drug: folded.contains("drug"),
        }
    }
}

/// One non-disease precedence step.
struct EntityStep {
    node_type: NodeType,
    relation: RelationQuery,
    kind: RelationKind,
}

fn entity_steps() -> [EntityStep; 5] {
    [
        EntityStep {
            node_type: NodeType::Gene,
            relation: RelationQuery::GENE_PROTEINS,
            kind: RelationKind::GeneProteins,
        },
        EntityStep {
            node_type: NodeType::Protein,
            relation: RelationQuery::PROTEIN_GENES,
            kind: RelationKind::ProteinGenes,
        },
        EntityStep {
            node_type: NodeType::Biomarker,
            relation: RelationQuery::BIOMARKER_DISEASES,
            kind: RelationKind::BiomarkerDiseases,
        },
        EntityStep {
            node_type: NodeType::Drug,
            relation: RelationQuery::DRUG_DISEASES,
            kind: RelationKind::DrugDiseases,
        },
        EntityStep {
            node_type: NodeType::Treatment,
            relation: RelationQuery::TREATMENT_DISEASES,
            kind: RelationKind::TreatmentDiseases,
        },
    ]
}

/// Answers queries against one graph snapshot. Cheap to construct per query.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    graph: Arc<Graph>,
}

impl QueryEngine {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    pub fn answer(&self, query: &str) -> QueryOutcome {
        let intent = QueryIntent::from_folded(&query.to_lowercase());

        if let Some(answer) = self.disease_answer(query, intent) {
            return QueryOutcome::Answered(answer);
        }

        for step in entity_steps() {
            for node in find_matches(&self.graph, query, &step.node_type) {
                let related = related_labels(&self.graph, &node.id, &step.relation);
                if !related.is_empty() {
                    debug!(node = %node.id, kind = ?step.kind, "graph answer");
                    return QueryOutcome::Answered(compose(&node.label, step.kind, &related));
                }
            }
        }

        debug!("no graph answer");
        QueryOutcome::NotFound
    }

    fn disease_answer(&self, query: &str, intent: QueryIntent) -> Option<String> {
        let wanted = [
            (intent.gene, RelationQuery::DISEASE_GENES, RelationKind::DiseaseGenes),
            (intent.protein, RelationQuery::DISEASE_PROTEINS, RelationKind::DiseaseProteins),
            (intent.biomarker, RelationQuery::DISEASE_BIOMARKERS, RelationKind::DiseaseBiomarkers),
            (intent.treatment, RelationQuery::DISEASE_TREATMENTS, RelationKind::DiseaseTreatments),
            (intent.drug, RelationQuery::DISEASE_DRUGS, RelationKind::DiseaseDrugs),
        ];

        for disease in find_matches(&self.graph, query, &NodeType::Disease) {
            for (asked, relation, kind) in &wanted {
                if !asked {
                    continue;
                }
                let related = related_labels(&self.graph, &disease.id, relation);
                if !related.is_empty() {
                    debug!(node = %disease.id, ?kind, "graph answer");
                    return Some(compose(&disease.label, *kind, &related));
                }
            }
        }
        None
    }
}
