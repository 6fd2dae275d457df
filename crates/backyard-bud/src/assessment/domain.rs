use serde::{Deserialize, Serialize};

use crate::rules::StructureType;

/// Facts about the land parcel, as consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub zone_type: String,
    /// Lot area in square metres.
    pub area_total: f64,
    pub heritage_overlay: bool,
    pub bushfire_prone: bool,
    pub has_environmental_overlay: bool,
    pub has_easement: bool,
    pub flood_overlay: bool,
}

/// Asbestos handling declared for the works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AsbestosCategory {
    /// No asbestos involved.
    #[default]
    A,
    /// Minor bonded asbestos within the self-removal area limit.
    B,
    /// Bonded asbestos above the limit, or friable asbestos.
    C,
    /// Removal by a licensed asbestos removalist.
    D,
}

impl AsbestosCategory {
    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }
}

/// Primary construction material named on the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionMaterial {
    Timber,
    Steel,
    Masonry,
    Concrete,
    Plastic,
    Composite,
    #[serde(other)]
    Other,
}

impl ConstructionMaterial {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "timber" | "wood" => Self::Timber,
            "steel" | "colorbond" | "metal" => Self::Steel,
            "masonry" | "brick" => Self::Masonry,
            "concrete" => Self::Concrete,
            "plastic" => Self::Plastic,
            "composite" => Self::Composite,
            _ => Self::Other,
        }
    }

    pub const fn is_combustible(self) -> bool {
        matches!(self, Self::Timber | Self::Plastic | Self::Composite)
    }
}

/// Garden structure specifics (sheds, cabanas, greenhouses).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GardenStructureDetails {
    pub is_shipping_container: bool,
    pub is_habitable: bool,
    pub existing_garden_structures: u32,
    pub cabana_services: bool,
    pub has_metal_components: bool,
    pub low_reflective_metal: Option<bool>,
}

/// Outdoor entertainment area specifics (decks, patios, pergolas).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorAreaDetails {
    pub has_walls: bool,
    pub wall_height: Option<f64>,
    pub floor_height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarportDetails {
    pub fascia_connected: bool,
    pub engineer_specified: bool,
}

/// Siting facts that cut across structure types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitingDetails {
    pub easement_distance: Option<f64>,
    pub behind_building_line: Option<bool>,
    pub in_rear_yard: Option<bool>,
    pub obstructs_adjacent_building: bool,
}

/// Validated description of the proposed structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub structure_type: StructureType,
    pub floor_area: f64,
    pub height: f64,
    pub boundary_distance: f64,
    /// `None` or zero means there is no dwelling on the lot.
    pub dwelling_distance: Option<f64>,
    pub tree_removal: bool,
    pub tree_permit: bool,
    pub asbestos_type: AsbestosCategory,
    pub stormwater_connected: bool,
    pub materials: Option<ConstructionMaterial>,
    pub non_combustible: Option<bool>,
    pub garden: GardenStructureDetails,
    pub outdoor: OutdoorAreaDetails,
    pub carport: CarportDetails,
    pub siting: SitingDetails,
}

impl Proposal {
    /// Baseline proposal with every optional fact at its safe default.
    pub fn new(structure_type: StructureType, floor_area: f64, height: f64, boundary_distance: f64) -> Self {
        Self {
            structure_type,
            floor_area,
            height,
            boundary_distance,
            dwelling_distance: None,
            tree_removal: false,
            tree_permit: false,
            asbestos_type: AsbestosCategory::A,
            stormwater_connected: true,
            materials: None,
            non_combustible: None,
            garden: GardenStructureDetails::default(),
            outdoor: OutdoorAreaDetails::default(),
            carport: CarportDetails::default(),
            siting: SitingDetails::default(),
        }
    }

    /// True when the declared materials rule out a non-combustible build.
    pub fn uses_combustible_materials(&self) -> bool {
        self.non_combustible == Some(false)
            || self
                .materials
                .map(ConstructionMaterial::is_combustible)
                .unwrap_or(false)
    }
}
