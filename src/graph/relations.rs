//! Relation resolution — the one edge scan every graph answer is built from.
//!
//! A [`RelationQuery`] fixes a direction, the accepted relation kinds and an
//! optional type for the node at the far end of the edge. The named queries
//! below are the ones the engine uses; they differ only in those three
//! parameters.

use std::collections::BTreeSet;

use tracing::warn;

use super::{Graph, NodeType};

/// Which end of an edge the starting node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges whose `source` is the node; collect their targets.
    Outgoing,
    /// Edges whose `target` is the node; collect their sources.
    Incoming,
}

/// Accepted relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationFilter {
    Any,
    OneOf(&'static [&'static str]),
}

impl RelationFilter {
    fn accepts(&self, relation: &str) -> bool {
        match self {
            RelationFilter::Any => true,
            RelationFilter::OneOf(kinds) => kinds.contains(&relation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationQuery {
    pub direction: Direction,
    pub relations: RelationFilter,
    /// Required type of the node at the other end, if any.
    pub target_type: Option<NodeType>,
}

impl RelationQuery {
    pub const DISEASE_GENES: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::OneOf(&["associated_with"]),
        target_type: Some(NodeType::Gene),
    };
    pub const DISEASE_PROTEINS: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::Any,
        target_type: Some(NodeType::Protein),
    };
    pub const DISEASE_BIOMARKERS: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::OneOf(&["biomarker_of"]),
        target_type: None,
    };
    pub const DISEASE_TREATMENTS: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::OneOf(&["treated_with"]),
        target_type: None,
    };
    pub const DISEASE_DRUGS: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::Any,
        target_type: Some(NodeType::Drug),
    };
    pub const GENE_PROTEINS: Self = Self {
        direction: Direction::Outgoing,
        relations: RelationFilter::OneOf(&["encodes"]),
        target_type: None,
    };
    pub const PROTEIN_GENES: Self = Self {
        direction: Direction::Incoming,
        relations: RelationFilter::OneOf(&["encodes"]),
        target_type: None,
    };
    pub const BIOMARKER_DISEASES: Self = Self {
        direction: Direction::Incoming,
        relations: RelationFilter::OneOf(&["biomarker_of"]),
        target_type: None,
    };
    pub const DRUG_DISEASES: Self = Self {
        direction: Direction::Incoming,
        relations: RelationFilter::OneOf(&["drug_used", "uses_drug"]),
        target_type: None,
    };
    pub const TREATMENT_DISEASES: Self = Self {
        direction: Direction::Incoming,
        relations: RelationFilter::OneOf(&["treated_with"]),
        target_type: None,
    };
}

/// Labels of the nodes reached from `node_id` under `query`, deduplicated
/// and sorted.
///
/// An edge pointing at a node id that does not exist is skipped with a
/// warning rather than failing the whole lookup.
pub fn related_labels(graph: &Graph, node_id: &str, query: &RelationQuery) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();

    for edge in graph.edges() {
        let (near, far) = match query.direction {
            Direction::Outgoing => (&edge.source, &edge.target),
            Direction::Incoming => (&edge.target, &edge.source),
        };
        if near != node_id || !query.relations.accepts(&edge.relation) {
            continue;
        }

        let Some(other) = graph.node(far) else {
            warn!(
                source = %edge.source,
                target = %edge.target,
                relation = %edge.relation,
                "edge references unknown node; relation unresolved"
            );
            continue;
        };

        if query.target_type.as_ref().is_some_and(|t| &other.node_type != t) {
            continue;
        }
        labels.insert(other.label.clone());
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{edge, node, sample_graph};

    fn list(set: BTreeSet<String>) -> Vec<String> {
        set.into_iter().collect()
    }

    #[test]
    fn outgoing_with_type_filter_deduplicates() {
        let graph = sample_graph();
        let genes = related_labels(&graph, "Disease:ovarian_cancer", &RelationQuery::DISEASE_GENES);
        // BRCA1 is linked twice.
        assert_eq!(list(genes), ["BRCA1", "BRCA2"]);
    }

    #[test]
    fn any_relation_filtered_by_target_type() {
        let graph = sample_graph();
        let drugs = related_labels(&graph, "Disease:ovarian_cancer", &RelationQuery::DISEASE_DRUGS);
        assert_eq!(list(drugs), ["Olaparib"]);
        let proteins =
            related_labels(&graph, "Disease:ovarian_cancer", &RelationQuery::DISEASE_PROTEINS);
        assert!(proteins.is_empty());
    }

    #[test]
    fn incoming_collects_sources() {
        let graph = sample_graph();
        let genes = related_labels(&graph, "Protein:brca1_protein", &RelationQuery::PROTEIN_GENES);
        assert_eq!(list(genes), ["BRCA1"]);
    }

    #[test]
    fn incoming_accepts_either_drug_relation() {
        let graph = sample_graph();
        let diseases = related_labels(&graph, "Drug:olaparib", &RelationQuery::DRUG_DISEASES);
        assert_eq!(list(diseases), ["breast cancer", "ovarian cancer"]);
    }

    #[test]
    fn direction_is_not_symmetric() {
        let graph = sample_graph();
        // BRCA1 only has an outgoing "encodes" edge.
        assert!(related_labels(&graph, "Gene:BRCA1", &RelationQuery::PROTEIN_GENES).is_empty());
        assert_eq!(
            list(related_labels(&graph, "Gene:BRCA1", &RelationQuery::GENE_PROTEINS)),
            ["BRCA1 protein"]
        );
    }

    #[test]
    fn dangling_endpoint_is_skipped() {
        let nodes = vec![
            node("Gene:A", "A", NodeType::Gene),
            node("Protein:a", "a-protein", NodeType::Protein),
        ];
        let edges = vec![
            edge("Gene:A", "Protein:missing", "encodes"),
            edge("Gene:A", "Protein:a", "encodes"),
        ];
        let graph = Graph::from_parts(nodes, edges).unwrap();
        let proteins = related_labels(&graph, "Gene:A", &RelationQuery::GENE_PROTEINS);
        assert_eq!(list(proteins), ["a-protein"]);
    }

    #[test]
    fn unknown_node_has_no_relations() {
        let graph = sample_graph();
        assert!(related_labels(&graph, "Gene:nope", &RelationQuery::GENE_PROTEINS).is_empty());
    }
}
