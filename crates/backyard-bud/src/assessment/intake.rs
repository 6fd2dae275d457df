use serde::{Deserialize, Serialize};

use super::domain::{
    AsbestosCategory, CarportDetails, ConstructionMaterial, GardenStructureDetails,
    OutdoorAreaDetails, Property, Proposal, SitingDetails,
};
use crate::rules::StructureType;

/// Wire envelope accepted by the assessment endpoint: `{ "property": .., "userInputs": .. }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub property: Option<PropertySubmission>,
    #[serde(default, rename = "userInputs")]
    pub user_inputs: Option<ProposalSubmission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySubmission {
    pub short_address: Option<String>,
    pub zone_type: Option<String>,
    pub zone_description: Option<String>,
    pub area_total: Option<f64>,
    pub heritage_overlay: Option<bool>,
    pub bushfire_prone: Option<bool>,
    pub has_environmental_overlay: Option<bool>,
    pub has_easement: Option<bool>,
    pub flood_overlay: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalSubmission {
    pub structure_type: Option<String>,
    pub floor_area: Option<f64>,
    pub height: Option<f64>,
    pub boundary_distance: Option<f64>,
    pub dwelling_distance: Option<f64>,
    pub tree_removal: Option<bool>,
    pub tree_permit: Option<bool>,
    pub asbestos_type: Option<String>,
    pub stormwater_connected: Option<bool>,
    pub materials: Option<String>,
    pub non_combustible: Option<bool>,
    pub is_shipping_container: Option<bool>,
    pub is_habitable: Option<bool>,
    pub existing_garden_structures: Option<u32>,
    pub cabana_services: Option<bool>,
    pub has_metal_components: Option<bool>,
    pub low_reflective_metal: Option<bool>,
    pub has_walls: Option<bool>,
    pub wall_height: Option<f64>,
    pub floor_height: Option<f64>,
    pub fascia_connected: Option<bool>,
    pub engineer_specified: Option<bool>,
    pub easement_distance: Option<f64>,
    pub behind_building_line: Option<bool>,
    pub in_rear_yard: Option<bool>,
    pub obstructs_adjacent_building: Option<bool>,
}

/// A single rejected field, addressed by its dotted path in the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field problem found in one submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid assessment request: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|error| error.field.as_str())
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{} {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Typed inputs ready for the engine, plus display metadata the engine ignores.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAssessment {
    pub property: Property,
    pub proposal: Proposal,
    pub address: Option<String>,
}

/// Boundary validation; nothing reaches the engine without passing through here.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, submission: &AssessmentSubmission) -> Result<ValidatedAssessment, ValidationError> {
        let mut errors = FieldErrors::default();

        let property = match &submission.property {
            Some(property) => self.property(property, &mut errors),
            None => {
                errors.push("property", "is required");
                None
            }
        };
        let proposal = match &submission.user_inputs {
            Some(inputs) => self.proposal(inputs, &mut errors),
            None => {
                errors.push("userInputs", "is required");
                None
            }
        };

        match (property, proposal) {
            (Some(property), Some(proposal)) if errors.is_empty() => Ok(ValidatedAssessment {
                property,
                proposal,
                address: submission
                    .property
                    .as_ref()
                    .and_then(|property| property.short_address.clone()),
            }),
            _ => Err(errors.into_error()),
        }
    }

    fn property(&self, input: &PropertySubmission, errors: &mut FieldErrors) -> Option<Property> {
        let zone_type = match input.zone_type.as_deref().map(str::trim) {
            Some(zone) if !zone.is_empty() => Some(zone.to_ascii_uppercase()),
            Some(_) => {
                errors.push("property.zone_type", "must not be empty");
                None
            }
            None => {
                errors.push("property.zone_type", "is required");
                None
            }
        };
        let area_total = errors.positive("property.area_total", input.area_total);
        let heritage_overlay = errors.flag("property.heritage_overlay", input.heritage_overlay);
        let bushfire_prone = errors.flag("property.bushfire_prone", input.bushfire_prone);
        let has_environmental_overlay =
            errors.flag("property.has_environmental_overlay", input.has_environmental_overlay);
        let has_easement = errors.flag("property.has_easement", input.has_easement);
        let flood_overlay = errors.flag("property.flood_overlay", input.flood_overlay);

        Some(Property {
            zone_type: zone_type?,
            area_total: area_total?,
            heritage_overlay: heritage_overlay?,
            bushfire_prone: bushfire_prone?,
            has_environmental_overlay: has_environmental_overlay?,
            has_easement: has_easement?,
            flood_overlay: flood_overlay?,
        })
    }

    fn proposal(&self, input: &ProposalSubmission, errors: &mut FieldErrors) -> Option<Proposal> {
        let structure_type = match input.structure_type.as_deref() {
            Some(label) => match StructureType::from_label(label)
                .filter(|kind| StructureType::proposable().contains(kind))
            {
                Some(kind) => Some(kind),
                None => {
                    errors.push(
                        "userInputs.structure_type",
                        format!(
                            "must be one of {}",
                            StructureType::proposable()
                                .iter()
                                .map(|kind| kind.label())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    );
                    None
                }
            },
            None => {
                errors.push("userInputs.structure_type", "is required");
                None
            }
        };

        let floor_area = errors.positive("userInputs.floor_area", input.floor_area);
        let height = errors.positive("userInputs.height", input.height);
        let boundary_distance = errors.non_negative("userInputs.boundary_distance", input.boundary_distance);
        let dwelling_distance = errors.optional_non_negative("userInputs.dwelling_distance", input.dwelling_distance);
        let tree_removal = errors.flag("userInputs.tree_removal", input.tree_removal);
        let stormwater_connected = errors.flag("userInputs.stormwater_connected", input.stormwater_connected);

        let asbestos_type = match input.asbestos_type.as_deref() {
            Some(code) => {
                let parsed = AsbestosCategory::from_code(code);
                if parsed.is_none() {
                    errors.push("userInputs.asbestos_type", "must be one of A, B, C, D");
                }
                parsed
            }
            None => {
                errors.push("userInputs.asbestos_type", "is required");
                None
            }
        };

        let wall_height = errors.optional_non_negative("userInputs.wall_height", input.wall_height);
        let floor_height = errors.optional_non_negative("userInputs.floor_height", input.floor_height);
        let easement_distance =
            errors.optional_non_negative("userInputs.easement_distance", input.easement_distance);

        Some(Proposal {
            structure_type: structure_type?,
            floor_area: floor_area?,
            height: height?,
            boundary_distance: boundary_distance?,
            dwelling_distance: dwelling_distance?,
            tree_removal: tree_removal?,
            tree_permit: input.tree_permit.unwrap_or(false),
            asbestos_type: asbestos_type?,
            stormwater_connected: stormwater_connected?,
            materials: input.materials.as_deref().map(ConstructionMaterial::from_label),
            non_combustible: input.non_combustible,
            garden: GardenStructureDetails {
                is_shipping_container: input.is_shipping_container.unwrap_or(false),
                is_habitable: input.is_habitable.unwrap_or(false),
                existing_garden_structures: input.existing_garden_structures.unwrap_or(0),
                cabana_services: input.cabana_services.unwrap_or(false),
                has_metal_components: input.has_metal_components.unwrap_or(false),
                low_reflective_metal: input.low_reflective_metal,
            },
            outdoor: OutdoorAreaDetails {
                has_walls: input.has_walls.unwrap_or(false),
                wall_height: wall_height?,
                floor_height: floor_height?,
            },
            carport: CarportDetails {
                fascia_connected: input.fascia_connected.unwrap_or(false),
                engineer_specified: input.engineer_specified.unwrap_or(false),
            },
            siting: SitingDetails {
                easement_distance: easement_distance?,
                behind_building_line: input.behind_building_line,
                in_rear_yard: input.in_rear_yard,
                obstructs_adjacent_building: input.obstructs_adjacent_building.unwrap_or(false),
            },
        })
    }
}

/// Accumulates field errors; each helper returns `None` when the field was rejected.
#[derive(Default)]
struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError { errors: self.errors }
    }

    fn flag(&mut self, field: &str, value: Option<bool>) -> Option<bool> {
        if value.is_none() {
            self.push(field, "is required");
        }
        value
    }

    fn positive(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(number) if number.is_finite() && number > 0.0 => Some(number),
            Some(_) => {
                self.push(field, "must be a positive number");
                None
            }
            None => {
                self.push(field, "is required");
                None
            }
        }
    }

    fn non_negative(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(number) if number.is_finite() && number >= 0.0 => Some(number),
            Some(_) => {
                self.push(field, "must be zero or greater");
                None
            }
            None => {
                self.push(field, "is required");
                None
            }
        }
    }

    /// Outer `None` means rejected; inner `None` means not supplied.
    fn optional_non_negative(&mut self, field: &str, value: Option<f64>) -> Option<Option<f64>> {
        match value {
            None => Some(None),
            Some(_) => self.non_negative(field, value).map(Some),
        }
    }
}
