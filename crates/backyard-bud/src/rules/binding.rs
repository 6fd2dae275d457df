use super::{RuleCategory, StructureType};
use serde::Serialize;

/// Check a rule row feeds, resolved once at load time.
///
/// Rows that bind to nothing are kept as [`RuleCheck::Citation`] so they remain visible in
/// rule listings without ever influencing an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCheck {
    TreeRemoval,
    Asbestos,
    HeritageOverlay,
    EnvironmentalOverlay,
    FloorArea,
    HeightCeiling,
    BoundarySetback,
    BuildingLine,
    BushfireMaterials,
    Stormwater,
    ShippingContainer,
    Habitable,
    StructureCount,
    MetalReflectivity,
    RearYard,
    BuildingAccess,
    Easement,
    CabanaServices,
    FloorHeight,
    WallHeight,
    FasciaConnection,
    Citation,
}

use RuleCheck::*;
use StructureType::*;

const CLAUSE_BINDINGS: &[(StructureType, &str, RuleCheck)] = &[
    (GardenStructuresAndStorage, "2.18(1)(a)", ShippingContainer),
    (GardenStructuresAndStorage, "2.18(1)(c)", HeightCeiling),
    (GardenStructuresAndStorage, "2.18(1)(d)", BoundarySetback),
    (GardenStructuresAndStorage, "2.18(1)(e)", BuildingLine),
    (GardenStructuresAndStorage, "2.18(1)(f)", Habitable),
    (GardenStructuresAndStorage, "2.18(1)(g)", StructureCount),
    (GardenStructuresAndStorage, "2.18(1)(h)", MetalReflectivity),
    (GardenStructuresAndStorage, "2.18(1)(j)", RearYard),
    (GardenStructuresAndStorage, "2.18(1)(k)", BuildingAccess),
    (GardenStructuresAndStorage, "2.18(1)(m)", Easement),
    (GardenStructuresAndStorage, "2.18(1)(n)", CabanaServices),
    (Carports, "2.20(1)(c)", HeightCeiling),
    (Carports, "2.20(1)(d)", BoundarySetback),
    (Carports, "2.20(1)(j)", FasciaConnection),
    (OutdoorEntertainmentAreas, "2.12(1)(b)", HeightCeiling),
    (OutdoorEntertainmentAreas, "2.12(1)(c)", FloorHeight),
    (OutdoorEntertainmentAreas, "2.12(1)(d)", WallHeight),
    (OutdoorEntertainmentAreas, "2.12(1)(e)", BoundarySetback),
];

pub(crate) fn bind(structure: StructureType, category: RuleCategory, clause: &str) -> RuleCheck {
    let clause = clause.trim();
    if let Some((_, _, check)) = CLAUSE_BINDINGS
        .iter()
        .find(|(kind, reference, _)| *kind == structure && reference.eq_ignore_ascii_case(clause))
    {
        return *check;
    }

    match category {
        RuleCategory::SizeLimits => FloorArea,
        RuleCategory::Drainage => Stormwater,
        RuleCategory::BushfireProtection => BushfireMaterials,
        RuleCategory::VegetationProtection => TreeRemoval,
        RuleCategory::HazardousMaterials => Asbestos,
        RuleCategory::HeritageConservation => HeritageOverlay,
        RuleCategory::EnvironmentalProtection => EnvironmentalOverlay,
        RuleCategory::HeightAndDimensions | RuleCategory::BoundarySetbacks | RuleCategory::Other => {
            Citation
        }
    }
}
