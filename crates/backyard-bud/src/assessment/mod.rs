//! Exempt development assessment: intake validation, the rule-driven engine, and its HTTP surface.
//!
//! The engine runs three check phases (general requirements, overlays, structure-specific)
//! that each return their own findings; the orchestrator merges them in order and derives
//! the classification once at the end.

pub mod domain;
pub(crate) mod evaluation;
pub mod intake;
pub mod result;
pub mod router;
pub mod service;
pub mod zoning;

#[cfg(test)]
mod tests;

pub use domain::{
    AsbestosCategory, CarportDetails, ConstructionMaterial, GardenStructureDetails,
    OutdoorAreaDetails, Property, Proposal, SitingDetails,
};
pub use evaluation::{classify, AssessmentEngine};
pub use intake::{
    AssessmentSubmission, FieldError, IntakeGuard, PropertySubmission, ProposalSubmission,
    ValidatedAssessment, ValidationError,
};
pub use result::{
    AssessmentResult, AssessmentSummary, Classification, ComplianceStatus, LegislationEntry,
};
pub use router::assessment_router;
pub use service::{AssessmentMetadata, AssessmentOutcome, AssessmentService};
pub use zoning::{ZoneClass, ZonePolicy};
