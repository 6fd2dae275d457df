use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::evaluation::AssessmentEngine;
use super::intake::{AssessmentSubmission, IntakeGuard, ValidatedAssessment, ValidationError};
use super::result::AssessmentResult;
use super::zoning::ZonePolicy;
use crate::audit::{AuditRecord, AuditStore};
use crate::error::AppError;
use crate::rules::{RuleCatalog, StructureType};

/// Service composing the intake guard, the live rule catalog, and the checkpoint store.
pub struct AssessmentService<S> {
    catalog: Arc<RuleCatalog>,
    guard: IntakeGuard,
    zones: ZonePolicy,
    audit: Arc<S>,
}

/// Assessment plus the request metadata echoed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    pub assessment: AssessmentResult,
    pub metadata: AssessmentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentMetadata {
    pub timestamp: DateTime<Utc>,
    pub structure_type: StructureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,
    pub checkpoint_id: String,
}

impl<S> AssessmentService<S>
where
    S: AuditStore + 'static,
{
    pub fn new(catalog: Arc<RuleCatalog>, audit: Arc<S>) -> Self {
        Self {
            catalog,
            guard: IntakeGuard::new(),
            zones: ZonePolicy::standard(),
            audit,
        }
    }

    pub fn with_zone_policy(mut self, zones: ZonePolicy) -> Self {
        self.zones = zones;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Engine bound to the table that is live right now.
    pub fn engine(&self) -> AssessmentEngine {
        AssessmentEngine::with_zone_policy(self.catalog.current(), self.zones.clone())
    }

    pub fn validate(&self, submission: &AssessmentSubmission) -> Result<ValidatedAssessment, ValidationError> {
        self.guard.validate(submission)
    }

    /// Validate, assess, and hand a checkpoint to the store without waiting on it.
    pub fn assess(&self, submission: &AssessmentSubmission) -> Result<AssessmentOutcome, ValidationError> {
        let (outcome, record) = self.evaluate(submission)?;
        self.checkpoint(record);
        Ok(outcome)
    }

    /// Validate, assess, and write the checkpoint before returning. Store failures are returned.
    pub fn assess_persisted(&self, submission: &AssessmentSubmission) -> Result<AssessmentOutcome, AppError> {
        let (outcome, record) = self.evaluate(submission)?;
        self.audit.record(&record)?;
        Ok(outcome)
    }

    fn evaluate(
        &self,
        submission: &AssessmentSubmission,
    ) -> Result<(AssessmentOutcome, AuditRecord), ValidationError> {
        let validated = self.guard.validate(submission)?;
        let assessment = self.engine().assess(&validated.property, &validated.proposal);
        info!(
            structure = %validated.proposal.structure_type,
            zone = %validated.property.zone_type,
            classification = assessment.headline(),
            "assessment completed"
        );

        let record = AuditRecord::new(submission, &assessment);
        let metadata = AssessmentMetadata {
            timestamp: record.timestamp,
            structure_type: validated.proposal.structure_type,
            property_address: validated.address,
            checkpoint_id: record.id.clone(),
        };
        Ok((AssessmentOutcome { assessment, metadata }, record))
    }

    /// Detached onto the blocking pool when called inside a runtime, written inline otherwise.
    /// A runtime that shuts down right after may drop the write; use `assess_persisted` there.
    fn checkpoint(&self, record: AuditRecord) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let audit = Arc::clone(&self.audit);
                handle.spawn_blocking(move || persist(audit.as_ref(), &record));
            }
            Err(_) => persist(self.audit.as_ref(), &record),
        }
    }
}

fn persist<S: AuditStore + ?Sized>(store: &S, record: &AuditRecord) {
    if let Err(err) = store.record(record) {
        warn!(checkpoint = %record.id, error = %err, "failed to persist assessment checkpoint");
    }
}
