//! Integration tests against the bundled `data/knowledge_graph.json`.

use std::path::Path;
use std::sync::Arc;

use herlens::fallback::{FallbackController, Provenance};
use herlens::graph::engine::{NOT_FOUND_SENTINEL, QueryEngine};
use herlens::graph::{Graph, GraphHandle, NodeType};
use herlens::llm::LlmProvider;
use herlens::llm::providers::dummy::DummyProvider;

const GRAPH_PATH: &str = "data/knowledge_graph.json";

fn engine() -> QueryEngine {
    let graph = Graph::load(Path::new(GRAPH_PATH)).expect("bundled graph loads");
    QueryEngine::new(Arc::new(graph))
}

#[test]
fn bundled_graph_is_consistent() {
    let graph = Graph::load(Path::new(GRAPH_PATH)).unwrap();
    assert_eq!(graph.dangling_edge_count(), 0);
    for node in graph.nodes() {
        assert_eq!(graph.node(&node.id), Some(node));
    }
    assert_eq!(graph.nodes_of_type(&NodeType::Disease).count(), 5);
}

#[test]
fn disease_questions() {
    let engine = engine();
    let cases = [
        (
            "What genes are associated with ovarian cancer?",
            "Genes associated with ovarian cancer: BRCA1, BRCA2, TP53",
        ),
        (
            "Which drugs treat breast cancer?",
            "Drugs used for breast cancer: Olaparib, Tamoxifen, Trastuzumab",
        ),
        (
            "What proteins are linked to breast cancer?",
            "Proteins linked to breast cancer: HER2",
        ),
        ("biomarkers for endometriosis", "Biomarkers for endometriosis: CA-125"),
        (
            "What is the treatment for cervical cancer?",
            "Treatments for cervical cancer: HPV vaccination, chemotherapy",
        ),
    ];
    for (q, expected) in cases {
        assert_eq!(engine.answer(q).as_text(), expected, "query {q:?}");
    }
}

#[test]
fn entity_questions() {
    let engine = engine();
    let cases = [
        (
            "What does CA-125 indicate?",
            "The biomarker CA-125 is associated with: endometriosis, ovarian cancer",
        ),
        (
            "What is olaparib used for?",
            "The drug Olaparib is used in treatment of: breast cancer, ovarian cancer",
        ),
        ("Which gene encodes HER2?", "The gene(s) encoding HER2 are: ERBB2"),
        ("What does TP53 encode?", "The protein(s) encoded by TP53 are: p53"),
        ("Is metformin used in PCOS?", "The drug Metformin is used in treatment of: PCOS"),
        (
            "Tell me about hormone therapy",
            "The treatment hormone therapy is used for: breast cancer, endometriosis",
        ),
    ];
    for (q, expected) in cases {
        assert_eq!(engine.answer(q).as_text(), expected, "query {q:?}");
    }
}

#[test]
fn unknown_entity_gives_sentinel() {
    assert_eq!(engine().answer("treatment for migraine").as_text(), NOT_FOUND_SENTINEL);
}

#[tokio::test]
async fn chain_uses_provider_only_when_graph_has_no_answer() {
    let provider = DummyProvider::echo();
    let controller = FallbackController::new(
        true,
        GraphHandle::load(GRAPH_PATH),
        vec![LlmProvider::Dummy(provider.clone())],
    );

    let answer = controller.answer("What does TP53 encode?").await.unwrap();
    assert_eq!(answer.provenance, Provenance::KnowledgeGraph);
    assert_eq!(provider.calls(), 0);

    let answer = controller.answer("treatment for migraine").await.unwrap();
    assert_eq!(answer.provenance, Provenance::Provider("dummy"));
    assert_eq!(answer.text, "[echo] treatment for migraine");
    assert_eq!(provider.calls(), 1);
}
