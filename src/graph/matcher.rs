//! Entity matching: which nodes of a type are named in the query text.
//!
//! A node matches when its lower-cased label occurs inside the lower-cased
//! query. The direction matters: the label must appear in the user's text,
//! not the other way round. Matches come back in the graph's node order and
//! overlapping labels are not disambiguated.

use super::{Graph, Node, NodeType};

/// Nodes of `node_type` whose label appears in `query`.
pub fn find_matches<'a>(
    graph: &'a Graph,
    query: &str,
    node_type: &'a NodeType,
) -> impl Iterator<Item = &'a Node> + 'a {
    let folded = query.to_lowercase();
    graph
        .nodes_of_type(node_type)
        .filter(move |node| label_in(&folded, &node.label))
}

/// `true` when the non-empty `label` occurs in the already-folded query.
fn label_in(folded_query: &str, label: &str) -> bool {
    !label.is_empty() && folded_query.contains(&label.to_lowercase())
}
