use serde::Serialize;

use super::domain::Property;
use crate::rules::StructureType;

pub const HEIGHT_CEILING_M: f64 = 3.0;
pub const WALL_HEIGHT_LIMIT_M: f64 = 1.4;
pub const FLOOR_HEIGHT_LIMIT_M: f64 = 1.0;
pub const EASEMENT_CLEARANCE_M: f64 = 1.0;
pub const BUSHFIRE_MATERIAL_DISTANCE_M: f64 = 5.0;
pub const MAX_GARDEN_STRUCTURES: u32 = 2;

const RURAL_SETBACK_M: f64 = 5.0;
const URBAN_SETBACK_M: f64 = 0.9;
const SMALL_LOT_AREA_M2: f64 = 300.0;

const STANDARD_RURAL_ZONES: &[&str] = &["RU1", "RU2", "RU3", "RU4", "RU6", "R5", "W2", "C3"];
const RESIDENTIAL_ZONES: &[&str] = &["R1", "R2", "R3", "R4", "R5"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    Rural,
    Urban,
}

/// Zone classification and the size and setback thresholds keyed by it.
#[derive(Debug, Clone)]
pub struct ZonePolicy {
    rural_zones: Vec<String>,
}

impl Default for ZonePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ZonePolicy {
    /// Rural and large-lot zones that earn the 50m² and 5m thresholds.
    pub fn standard() -> Self {
        Self::with_rural_zones(STANDARD_RURAL_ZONES.iter().copied())
    }

    pub fn with_rural_zones<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rural_zones: zones
                .into_iter()
                .map(|zone| zone.as_ref().trim().to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn zone_class(&self, zone_code: &str) -> ZoneClass {
        let code = zone_code.trim().to_ascii_uppercase();
        if self.rural_zones.iter().any(|zone| *zone == code) {
            ZoneClass::Rural
        } else {
            ZoneClass::Urban
        }
    }

    pub fn is_residential(&self, zone_code: &str) -> bool {
        let code = zone_code.trim().to_ascii_uppercase();
        RESIDENTIAL_ZONES.iter().any(|zone| *zone == code)
    }

    pub fn max_floor_area(&self, structure: StructureType, property: &Property) -> f64 {
        let rural = self.zone_class(&property.zone_type) == ZoneClass::Rural;
        match structure {
            StructureType::GardenStructuresAndStorage => {
                if rural {
                    50.0
                } else {
                    20.0
                }
            }
            StructureType::Carports => {
                if property.area_total > SMALL_LOT_AREA_M2 {
                    if rural {
                        50.0
                    } else {
                        25.0
                    }
                } else {
                    20.0
                }
            }
            StructureType::OutdoorEntertainmentAreas => 25.0,
            StructureType::GeneralRequirements => 20.0,
        }
    }

    pub fn min_boundary_setback(&self, property: &Property) -> f64 {
        match self.zone_class(&property.zone_type) {
            ZoneClass::Rural => RURAL_SETBACK_M,
            ZoneClass::Urban => URBAN_SETBACK_M,
        }
    }
}
