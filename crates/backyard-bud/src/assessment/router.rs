use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::intake::{AssessmentSubmission, ValidationError};
use super::service::AssessmentService;
use crate::audit::AuditStore;
use crate::error::AppError;
use crate::rules::StructureType;

/// Router builder exposing assessment and rule-table endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: AuditStore + 'static,
{
    Router::new()
        .route("/api/assess", post(assess_handler::<S>))
        .route("/api/assess/validate", post(validate_handler::<S>))
        .route("/api/rules", get(rules_handler::<S>))
        .route("/api/rules/reload", post(reload_handler::<S>))
        .route("/api/rules/:structure_type", get(structure_rules_handler::<S>))
        .with_state(service)
}

fn submission_from(
    payload: Result<Json<AssessmentSubmission>, JsonRejection>,
) -> Result<AssessmentSubmission, AppError> {
    payload
        .map(|Json(submission)| submission)
        .map_err(|rejection| AppError::Validation(ValidationError::single("body", rejection.body_text())))
}

pub(crate) async fn assess_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    payload: Result<Json<AssessmentSubmission>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: AuditStore + 'static,
{
    let submission = submission_from(payload)?;
    let outcome = service.assess(&submission)?;
    let payload = json!({
        "success": true,
        "assessment": outcome.assessment,
        "metadata": outcome.metadata,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn validate_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    payload: Result<Json<AssessmentSubmission>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: AuditStore + 'static,
{
    let submission = submission_from(payload)?;
    let validated = service.validate(&submission)?;
    let payload = json!({
        "valid": true,
        "structureType": validated.proposal.structure_type,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn rules_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: AuditStore + 'static,
{
    let table = service.catalog().current();
    let payload = json!({
        "ruleCount": table.len(),
        "source": table.source().map(|path| path.display().to_string()),
        "rules": table.rules(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RuleFilter {
    category: Option<String>,
}

pub(crate) async fn structure_rules_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(structure_type): Path<String>,
    Query(filter): Query<RuleFilter>,
) -> Response
where
    S: AuditStore + 'static,
{
    let table = service.catalog().current();
    let rules = table.relevant_by_label(&structure_type, filter.category.as_deref());
    if rules.is_empty() {
        let available: Vec<_> = [
            StructureType::GeneralRequirements,
            StructureType::GardenStructuresAndStorage,
            StructureType::Carports,
            StructureType::OutdoorEntertainmentAreas,
        ]
        .iter()
        .map(|kind| json!({ "label": kind.label(), "slug": kind.slug() }))
        .collect();
        let payload = json!({
            "error": format!("no rules found for structure type `{structure_type}`"),
            "availableTypes": available,
        });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    }

    let payload = json!({
        "structureType": structure_type,
        "ruleCount": rules.len(),
        "rules": rules,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn reload_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
) -> Result<Response, AppError>
where
    S: AuditStore + 'static,
{
    let table = service.catalog().reload()?;
    let payload = json!({
        "success": true,
        "ruleCount": table.len(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
