use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use backyard_bud::assessment::{assessment_router, AssessmentService};
use backyard_bud::audit::{checkpoint_router, AuditStore};
use backyard_bud::property::{property_router, PropertyDirectory};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(
    service: Arc<AssessmentService<S>>,
    audit: Arc<S>,
    directory: Arc<PropertyDirectory>,
) -> axum::Router
where
    S: AuditStore + 'static,
{
    assessment_router(service)
        .merge(checkpoint_router(audit))
        .merge(property_router(directory))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound; an empty rule table is reported as degraded, not unready.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if !ready {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        );
    }

    let rule_count = state.catalog.current().len();
    let status = if rule_count == 0 { "degraded" } else { "ready" };
    (
        StatusCode::OK,
        Json(json!({ "status": status, "ruleCount": rule_count })),
    )
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
