use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::error;

use super::service::{ReportError, ReportService};
use crate::assessment::SubmissionRepository;
use crate::error::json_error;
use crate::identity::{AuthenticatedUser, Capability, UserId, UserRepository};
use crate::validation::PathParams;

/// Router builder exposing individual PDF reports and department aggregates.
pub fn report_router<S, U>(service: Arc<ReportService<S, U>>) -> Router
where
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports/user/:user_id",
            get(user_report_handler::<S, U>),
        )
        .route(
            "/api/v1/reports/user/:user_id/summary",
            get(user_summary_handler::<S, U>),
        )
        .route(
            "/api/v1/reports/department",
            get(department_report_handler::<S, U>),
        )
        .with_state(service)
}

pub(crate) async fn user_report_handler<S, U>(
    State(service): State<Arc<ReportService<S, U>>>,
    caller: AuthenticatedUser,
    PathParams(user_id): PathParams<u64>,
) -> Response
where
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    let owner = UserId(user_id);
    if let Err(forbidden) = caller.authorize_owner(owner) {
        return forbidden.into_response();
    }

    match service.user_report_pdf(owner) {
        Ok(Some(document)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=report-{owner}.pdf"),
                ),
            ],
            document,
        )
            .into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Reporte no encontrado"),
        Err(err) => report_error_response(err),
    }
}

pub(crate) async fn user_summary_handler<S, U>(
    State(service): State<Arc<ReportService<S, U>>>,
    caller: AuthenticatedUser,
    PathParams(user_id): PathParams<u64>,
) -> Response
where
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    let owner = UserId(user_id);
    if let Err(forbidden) = caller.authorize_owner(owner) {
        return forbidden.into_response();
    }

    match service.user_report(owner) {
        Ok(Some(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Reporte no encontrado"),
        Err(err) => report_error_response(err),
    }
}

pub(crate) async fn department_report_handler<S, U>(
    State(service): State<Arc<ReportService<S, U>>>,
    caller: AuthenticatedUser,
) -> Response
where
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(forbidden) = caller.authorize(Capability::ViewDepartmentReports) {
        return forbidden.into_response();
    }

    match service.department_reports() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => report_error_response(err),
    }
}

fn report_error_response(err: ReportError) -> Response {
    error!(error = %err, "report generation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
