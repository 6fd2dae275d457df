use super::super::result::{ComplianceStatus, LegislationEntry};
use super::super::zoning::EASEMENT_CLEARANCE_M;
use super::{metres, CheckContext, Findings};
use crate::rules::{RuleCheck, StructureType};

/// Heritage, environmental, easement and flood overlays.
pub(super) fn check(context: &CheckContext<'_>) -> Findings {
    let mut findings = Findings::default();
    let property = context.property;
    let structure = context.proposal.structure_type;
    let is_garden = structure == StructureType::GardenStructuresAndStorage;

    if property.heritage_overlay {
        findings.issue(
            "Heritage overlay: exempt development is not available on a heritage item without a Heritage Act exemption",
        );
        for rule in context
            .rules
            .bound(StructureType::GeneralRequirements, RuleCheck::HeritageOverlay)
        {
            findings.cite(LegislationEntry::cite(rule, ComplianceStatus::Fails).observed("Heritage overlay applies"));
        }
    }

    if property.has_environmental_overlay {
        let status = if is_garden {
            findings.issue(
                "Environmental overlay: garden structures are not exempt development in environmentally sensitive areas",
            );
            ComplianceStatus::Fails
        } else {
            findings.condition("Environmental assessment may be required: confirm with council's environmental planning team");
            ComplianceStatus::Conditional
        };
        for rule in context
            .rules
            .bound(StructureType::GeneralRequirements, RuleCheck::EnvironmentalOverlay)
        {
            findings.cite(LegislationEntry::cite(rule, status).observed("Environmental overlay applies"));
        }
    }

    if property.has_easement {
        if is_garden {
            easement(context, &mut findings);
        } else {
            findings.cite(
                LegislationEntry::informational(
                    "Property has a registered easement",
                    "Keep the structure clear of the easement and confirm any restrictions on title",
                )
                .observed("Easement present"),
            );
        }
    }

    if property.flood_overlay {
        findings.cite(
            LegislationEntry::informational(
                "Property is within a flood planning area",
                "Flood-related development controls may apply; check floor levels and materials with council",
            )
            .observed("Flood overlay applies"),
        );
    }

    findings
}

fn easement(context: &CheckContext<'_>, findings: &mut Findings) {
    let limit = format!("at least {}", metres(EASEMENT_CLEARANCE_M));
    let rules = context
        .rules
        .bound(StructureType::GardenStructuresAndStorage, RuleCheck::Easement);

    match context.proposal.siting.easement_distance {
        Some(distance) => {
            let clear = distance >= EASEMENT_CLEARANCE_M;
            if !clear {
                findings.issue(format!(
                    "Easement clearance too small: structure is {} from a registered easement ({} required)",
                    metres(distance),
                    limit
                ));
            }
            for rule in rules {
                findings.cite(
                    LegislationEntry::cite(rule, ComplianceStatus::passes(clear))
                        .measured(metres(distance), limit.clone()),
                );
            }
        }
        None => {
            findings.condition(
                "Easement present: structure must be at least 1m from any registered easement (distance not supplied)",
            );
            for rule in rules {
                findings.cite(
                    LegislationEntry::cite(rule, ComplianceStatus::MoreInfoRequired)
                        .measured("Not supplied", limit.clone()),
                );
            }
        }
    }
}
