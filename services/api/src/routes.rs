use crate::infra::{AppState, Stores};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use nom035::assessment::{assessment_router, AssessmentService, RiskThresholds};
use nom035::identity::{identity_router, Authenticator, IdentityService};
use nom035::reporting::{report_router, ReportService};
use serde_json::json;
use std::sync::Arc;

/// Every API router plus the operational endpoints, sharing one set of stores.
pub(crate) fn with_service_routes(
    stores: &Stores,
    authenticator: Arc<Authenticator>,
    thresholds: RiskThresholds,
) -> Router {
    let identity = Arc::new(IdentityService::new(
        stores.users.clone(),
        authenticator.clone(),
    ));
    let assessment = Arc::new(AssessmentService::new(
        stores.submissions.clone(),
        stores.questionnaires.clone(),
        thresholds,
    ));
    let reports = Arc::new(ReportService::new(
        stores.submissions.clone(),
        stores.users.clone(),
    ));

    identity_router(identity)
        .merge(assessment_router(assessment))
        .merge(report_router(reports))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(authenticator))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
