use super::super::result::{ComplianceStatus, LegislationEntry};
use super::super::zoning::{
    ZoneClass, BUSHFIRE_MATERIAL_DISTANCE_M, FLOOR_HEIGHT_LIMIT_M, HEIGHT_CEILING_M,
    MAX_GARDEN_STRUCTURES, WALL_HEIGHT_LIMIT_M,
};
use super::{metres, square_metres, CheckContext, Findings};
use crate::rules::{RuleCheck, StructureType};

/// Size, height, setback, bushfire and drainage, then the per-type extras.
pub(super) fn check(context: &CheckContext<'_>) -> Findings {
    let mut findings = Findings::default();

    floor_area(context, &mut findings);
    height(context, &mut findings);
    boundary_setback(context, &mut findings);
    bushfire_materials(context, &mut findings);
    drainage(context, &mut findings);

    match context.proposal.structure_type {
        StructureType::GardenStructuresAndStorage => garden_extras(context, &mut findings),
        StructureType::OutdoorEntertainmentAreas => outdoor_extras(context, &mut findings),
        StructureType::Carports => carport_extras(context, &mut findings),
        StructureType::GeneralRequirements => {}
    }

    findings
}

fn floor_area(context: &CheckContext<'_>, findings: &mut Findings) {
    let proposal = context.proposal;
    let max = context
        .zones
        .max_floor_area(proposal.structure_type, context.property);
    let within = proposal.floor_area <= max;
    if !within {
        findings.issue(format!(
            "Floor area exceeds limit ({} > {})",
            square_metres(proposal.floor_area),
            square_metres(max)
        ));
    }
    for rule in context.rules.bound(proposal.structure_type, RuleCheck::FloorArea) {
        findings.cite(
            LegislationEntry::cite(rule, ComplianceStatus::passes(within))
                .measured(square_metres(proposal.floor_area), square_metres(max)),
        );
    }
}

fn height(context: &CheckContext<'_>, findings: &mut Findings) {
    let proposal = context.proposal;
    let within = proposal.height <= HEIGHT_CEILING_M;
    if !within {
        findings.issue(format!(
            "Height exceeds limit ({} > {})",
            metres(proposal.height),
            metres(HEIGHT_CEILING_M)
        ));
    }
    for rule in context.rules.bound(proposal.structure_type, RuleCheck::HeightCeiling) {
        findings.cite(
            LegislationEntry::cite(rule, ComplianceStatus::passes(within))
                .measured(metres(proposal.height), metres(HEIGHT_CEILING_M)),
        );
    }
}

fn boundary_setback(context: &CheckContext<'_>, findings: &mut Findings) {
    let proposal = context.proposal;
    let minimum = context.zones.min_boundary_setback(context.property);
    let clear = proposal.boundary_distance >= minimum;
    if !clear {
        findings.issue(format!(
            "Boundary setback too small ({} < {})",
            metres(proposal.boundary_distance),
            metres(minimum)
        ));
    }
    for rule in context.rules.bound(proposal.structure_type, RuleCheck::BoundarySetback) {
        findings.cite(
            LegislationEntry::cite(rule, ComplianceStatus::passes(clear))
                .measured(metres(proposal.boundary_distance), format!("at least {}", metres(minimum))),
        );
    }
}

fn bushfire_materials(context: &CheckContext<'_>, findings: &mut Findings) {
    if !context.property.bushfire_prone {
        return;
    }
    let proposal = context.proposal;
    let combustible = proposal.uses_combustible_materials();

    let (status, observed, note) = match proposal.dwelling_distance {
        Some(distance) if distance > 0.0 && distance < BUSHFIRE_MATERIAL_DISTANCE_M => {
            let status = if !combustible {
                ComplianceStatus::Complies
            } else if proposal.structure_type == StructureType::OutdoorEntertainmentAreas {
                findings.issue(format!(
                    "Combustible materials not permitted: outdoor entertainment areas within {} of a dwelling on bushfire prone land must be non-combustible",
                    metres(BUSHFIRE_MATERIAL_DISTANCE_M)
                ));
                ComplianceStatus::Fails
            } else {
                findings.condition(format!(
                    "Non-combustible materials mandatory: structure is {} from a dwelling on bushfire prone land (no timber, plastic or composite)",
                    metres(distance)
                ));
                ComplianceStatus::Conditional
            };
            (
                status,
                format!("{} from dwelling", metres(distance)),
                "Non-combustible materials required within 5m of a dwelling",
            )
        }
        Some(distance) if distance >= BUSHFIRE_MATERIAL_DISTANCE_M => (
            ComplianceStatus::Complies,
            format!("{} from dwelling", metres(distance)),
            "More than 5m from a dwelling: non-combustible materials recommended but not required",
        ),
        _ => (
            ComplianceStatus::Complies,
            "No dwelling on the lot".to_string(),
            "No material restriction applies",
        ),
    };

    for rule in context.rules.bound(proposal.structure_type, RuleCheck::BushfireMaterials) {
        findings.cite(
            LegislationEntry::cite(rule, status)
                .observed(observed.clone())
                .noted(note),
        );
    }
}

fn drainage(context: &CheckContext<'_>, findings: &mut Findings) {
    let proposal = context.proposal;
    let connected = proposal.stormwater_connected;
    if !connected {
        findings.issue("Stormwater not connected: roofwater must drain to an existing stormwater system");
    }
    let observed = if connected {
        "Connected to stormwater"
    } else {
        "Not connected to stormwater"
    };
    for rule in context.rules.bound(proposal.structure_type, RuleCheck::Stormwater) {
        findings.cite(LegislationEntry::cite(rule, ComplianceStatus::passes(connected)).observed(observed));
    }
}

fn garden_extras(context: &CheckContext<'_>, findings: &mut Findings) {
    let garden = &context.proposal.garden;
    let siting = &context.proposal.siting;
    let structure = StructureType::GardenStructuresAndStorage;
    let rules = context.rules;

    if garden.is_shipping_container {
        findings.issue("Shipping containers are not permitted as exempt garden structures");
    }
    for rule in rules.bound(structure, RuleCheck::ShippingContainer) {
        findings.cite(LegislationEntry::cite(
            rule,
            ComplianceStatus::passes(!garden.is_shipping_container),
        ));
    }

    if garden.is_habitable {
        findings.issue("Structure must not be habitable");
    }
    for rule in rules.bound(structure, RuleCheck::Habitable) {
        findings.cite(LegislationEntry::cite(rule, ComplianceStatus::passes(!garden.is_habitable)));
    }

    let count_ok = garden.existing_garden_structures < MAX_GARDEN_STRUCTURES;
    if !count_ok {
        findings.issue(format!(
            "Maximum of {} garden structures per lot ({} already present)",
            MAX_GARDEN_STRUCTURES, garden.existing_garden_structures
        ));
    }
    for rule in rules.bound(structure, RuleCheck::StructureCount) {
        findings.cite(
            LegislationEntry::cite(rule, ComplianceStatus::passes(count_ok)).measured(
                format!("{} existing", garden.existing_garden_structures),
                format!("fewer than {MAX_GARDEN_STRUCTURES} existing"),
            ),
        );
    }

    let rural = context.zones.zone_class(&context.property.zone_type) == ZoneClass::Rural;
    if let (false, Some(behind)) = (rural, siting.behind_building_line) {
        let status = if behind {
            ComplianceStatus::Complies
        } else {
            findings.condition("Building line setback: structure must be located behind the building line of any road frontage");
            ComplianceStatus::Conditional
        };
        for rule in rules.bound(structure, RuleCheck::BuildingLine) {
            findings.cite(LegislationEntry::cite(rule, status));
        }
    }

    if garden.has_metal_components && context.zones.is_residential(&context.property.zone_type) {
        let status = if garden.low_reflective_metal == Some(false) {
            findings.condition("Metal components must be low reflective, factory pre-coloured materials in residential zones");
            ComplianceStatus::Conditional
        } else {
            ComplianceStatus::Complies
        };
        for rule in rules.bound(structure, RuleCheck::MetalReflectivity) {
            findings.cite(LegislationEntry::cite(rule, status));
        }
    }

    if context.property.heritage_overlay {
        if let Some(in_rear) = siting.in_rear_yard {
            let status = if in_rear {
                ComplianceStatus::Complies
            } else {
                findings.condition("Heritage conservation area: structure must be located in the rear yard");
                ComplianceStatus::Conditional
            };
            for rule in rules.bound(structure, RuleCheck::RearYard) {
                findings.cite(LegislationEntry::cite(rule, status));
            }
        }
    }

    if siting.obstructs_adjacent_building {
        findings.condition(
            "Structure must not interfere with entry to, exit from or fire safety measures of an adjacent building",
        );
        for rule in rules.bound(structure, RuleCheck::BuildingAccess) {
            findings.cite(LegislationEntry::cite(rule, ComplianceStatus::Conditional));
        }
    }

    if garden.cabana_services {
        findings.condition("Cabana must not have water, sewer or electricity services connected beyond exempt plumbing");
        for rule in rules.bound(structure, RuleCheck::CabanaServices) {
            findings.cite(LegislationEntry::cite(rule, ComplianceStatus::Conditional));
        }
    }
}

fn outdoor_extras(context: &CheckContext<'_>, findings: &mut Findings) {
    let outdoor = &context.proposal.outdoor;
    let structure = StructureType::OutdoorEntertainmentAreas;

    if outdoor.has_walls {
        let wall_height = outdoor.wall_height.unwrap_or(0.0);
        let within = wall_height <= WALL_HEIGHT_LIMIT_M;
        if !within {
            findings.issue(format!(
                "Wall height exceeds limit ({} > {})",
                metres(wall_height),
                metres(WALL_HEIGHT_LIMIT_M)
            ));
        }
        for rule in context.rules.bound(structure, RuleCheck::WallHeight) {
            let entry = LegislationEntry::cite(rule, ComplianceStatus::passes(within));
            let entry = match outdoor.wall_height {
                Some(height) => entry.measured(metres(height), metres(WALL_HEIGHT_LIMIT_M)),
                None => entry.measured("Not supplied", metres(WALL_HEIGHT_LIMIT_M)),
            };
            findings.cite(entry);
        }
    }

    if let Some(floor_height) = outdoor.floor_height {
        let within = floor_height <= FLOOR_HEIGHT_LIMIT_M;
        if !within {
            findings.issue(format!(
                "Floor height exceeds limit ({} > {} above ground level)",
                metres(floor_height),
                metres(FLOOR_HEIGHT_LIMIT_M)
            ));
        }
        for rule in context.rules.bound(structure, RuleCheck::FloorHeight) {
            findings.cite(
                LegislationEntry::cite(rule, ComplianceStatus::passes(within))
                    .measured(metres(floor_height), metres(FLOOR_HEIGHT_LIMIT_M)),
            );
        }
    }
}

fn carport_extras(context: &CheckContext<'_>, findings: &mut Findings) {
    let carport = &context.proposal.carport;
    if !carport.fascia_connected {
        return;
    }
    let status = if carport.engineer_specified {
        ComplianceStatus::Complies
    } else {
        findings.condition("Fascia connection must be designed to a professional engineer's specification");
        ComplianceStatus::Conditional
    };
    for rule in context.rules.bound(StructureType::Carports, RuleCheck::FasciaConnection) {
        findings.cite(LegislationEntry::cite(rule, status));
    }
}
