use super::common::*;
use crate::assessment::{
    AsbestosCategory, AssessmentResult, Classification, ComplianceStatus, ConstructionMaterial,
    Property, Proposal, SitingDetails,
};
use crate::rules::StructureType;

/// A spread of lots and proposals covering every overlay and structure type.
fn sample_inputs() -> Vec<(Property, Proposal)> {
    let lots = [
        urban_lot(),
        property("R2", 280.0),
        rural_bushfire_lot(),
        Property {
            heritage_overlay: true,
            has_easement: true,
            flood_overlay: true,
            ..urban_lot()
        },
        Property {
            has_environmental_overlay: true,
            bushfire_prone: true,
            ..property("C3", 25_000.0)
        },
    ];

    let mut inputs = Vec::new();
    for lot in lots {
        for structure in StructureType::proposable() {
            for (floor_area, dwelling, materials, asbestos) in [
                (15.0, Some(10.0), None, AsbestosCategory::A),
                (24.0, Some(3.0), Some(ConstructionMaterial::Timber), AsbestosCategory::D),
                (60.0, None, Some(ConstructionMaterial::Steel), AsbestosCategory::C),
            ] {
                let proposal = Proposal {
                    floor_area,
                    dwelling_distance: dwelling,
                    materials,
                    asbestos_type: asbestos,
                    siting: SitingDetails {
                        easement_distance: dwelling.map(|distance| distance / 4.0),
                        ..SitingDetails::default()
                    },
                    ..proposal(structure)
                };
                inputs.push((lot.clone(), proposal));
            }
        }
    }
    inputs
}

fn assess_all() -> Vec<AssessmentResult> {
    let engine = engine();
    sample_inputs()
        .iter()
        .map(|(property, proposal)| engine.assess(property, proposal))
        .collect()
}

#[test]
fn repeated_assessments_are_identical() {
    let engine = engine();
    for (property, proposal) in sample_inputs() {
        assert_eq!(engine.assess(&property, &proposal), engine.assess(&property, &proposal));
    }
}

#[test]
fn classification_partitions_on_issues_then_conditions() {
    for result in assess_all() {
        let expected = if !result.issues.is_empty() {
            Classification::NonExempt
        } else if !result.conditions.is_empty() {
            Classification::Conditional
        } else {
            Classification::Approved
        };
        assert_eq!(result.classification, expected);
    }
}

#[test]
fn summary_counts_cover_legislation_applied() {
    for result in assess_all() {
        let summary = result.summary;
        assert_eq!(summary.total_checked, result.legislation_applied.len());
        assert!(summary.complies + summary.fails + summary.conditional <= summary.total_checked);

        let informational = result
            .legislation_applied
            .iter()
            .filter(|entry| entry.status == ComplianceStatus::Informational)
            .count();
        assert_eq!(
            summary.complies + summary.fails + summary.conditional + informational,
            summary.total_checked
        );
    }
}

#[test]
fn making_a_failing_proposal_stricter_keeps_it_non_exempt() {
    let engine = engine();
    for (property, proposal) in sample_inputs() {
        let before = engine.assess(&property, &proposal);
        if before.issues.is_empty() {
            continue;
        }
        let stricter = Proposal {
            floor_area: proposal.floor_area + 100.0,
            height: proposal.height + 2.0,
            ..proposal
        };
        let after = engine.assess(&property, &stricter);
        assert!(!after.issues.is_empty());
        assert_eq!(after.classification, Classification::NonExempt);
    }
}
