//! Answer sentence templates.

use std::collections::BTreeSet;

/// What an answer is about; selects the sentence template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    DiseaseGenes,
    DiseaseProteins,
    DiseaseBiomarkers,
    DiseaseTreatments,
    DiseaseDrugs,
    GeneProteins,
    ProteinGenes,
    BiomarkerDiseases,
    DrugDiseases,
    TreatmentDiseases,
}

/// Render the answer for `source_label` and its related labels.
///
/// Labels are already sorted and unique (they come from a `BTreeSet`).
/// Callers never pass an empty set; an empty relation means "no answer",
/// not an empty list.
pub fn compose(source_label: &str, kind: RelationKind, related: &BTreeSet<String>) -> String {
    let list = related.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    match kind {
        RelationKind::DiseaseGenes => format!("Genes associated with {source_label}: {list}"),
        RelationKind::DiseaseProteins => format!("Proteins linked to {source_label}: {list}"),
        RelationKind::DiseaseBiomarkers => format!("Biomarkers for {source_label}: {list}"),
        RelationKind::DiseaseTreatments => format!("Treatments for {source_label}: {list}"),
        RelationKind::DiseaseDrugs => format!("Drugs used for {source_label}: {list}"),
        RelationKind::GeneProteins => {
            format!("The protein(s) encoded by {source_label} are: {list}")
        }
        RelationKind::ProteinGenes => format!("The gene(s) encoding {source_label} are: {list}"),
        RelationKind::BiomarkerDiseases => {
            format!("The biomarker {source_label} is associated with: {list}")
        }
        RelationKind::DrugDiseases => {
            format!("The drug {source_label} is used in treatment of: {list}")
        }
        RelationKind::TreatmentDiseases => {
            format!("The treatment {source_label} is used for: {list}")
        }
    }
}
