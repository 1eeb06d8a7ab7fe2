use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::error;

use super::domain::{NewQuestionnaire, QuestionnaireId};
use super::repository::{QuestionnaireRepository, SubmissionRepository};
use super::service::{AssessmentService, AssessmentServiceError};
use super::validation::SubmitResponsePayload;
use crate::error::json_error;
use crate::identity::{AuthenticatedUser, Capability, UserId};
use crate::validation::{validated, JsonBody, PathParams};

/// Router builder exposing questionnaire catalogue and submission endpoints.
pub fn assessment_router<S, Q>(service: Arc<AssessmentService<S, Q>>) -> Router
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/questionnaires",
            get(list_questionnaires_handler::<S, Q>).post(create_questionnaire_handler::<S, Q>),
        )
        .route(
            "/api/v1/questionnaires/:questionnaire_id",
            get(questionnaire_handler::<S, Q>),
        )
        .route("/api/v1/responses", post(submit_handler::<S, Q>))
        .route(
            "/api/v1/users/:user_id/responses",
            get(history_handler::<S, Q>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S, Q>(
    State(service): State<Arc<AssessmentService<S, Q>>>,
    caller: AuthenticatedUser,
    JsonBody(payload): JsonBody<SubmitResponsePayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    if let Err(forbidden) = caller.authorize(Capability::SubmitResponses) {
        return forbidden.into_response();
    }

    let request = match payload.into_request() {
        Ok(request) => request,
        Err(errors) => return errors.into_response(),
    };

    match service.submit(caller.id(), request) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn history_handler<S, Q>(
    State(service): State<Arc<AssessmentService<S, Q>>>,
    caller: AuthenticatedUser,
    PathParams(user_id): PathParams<u64>,
) -> Response
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    let owner = UserId(user_id);
    if let Err(forbidden) = caller.authorize_owner(owner) {
        return forbidden.into_response();
    }

    match service.history_for_user(owner) {
        Ok(submissions) => (StatusCode::OK, Json(submissions)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn list_questionnaires_handler<S, Q>(
    State(service): State<Arc<AssessmentService<S, Q>>>,
) -> Response
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    match service.questionnaires() {
        Ok(questionnaires) => (StatusCode::OK, Json(questionnaires)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn questionnaire_handler<S, Q>(
    State(service): State<Arc<AssessmentService<S, Q>>>,
    PathParams(questionnaire_id): PathParams<u64>,
) -> Response
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    match service.questionnaire(QuestionnaireId(questionnaire_id)) {
        Ok(questionnaire) => (StatusCode::OK, Json(questionnaire)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn create_questionnaire_handler<S, Q>(
    State(service): State<Arc<AssessmentService<S, Q>>>,
    caller: AuthenticatedUser,
    JsonBody(draft): JsonBody<NewQuestionnaire>,
) -> Response
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    if let Err(forbidden) = caller.authorize(Capability::ManageQuestionnaires) {
        return forbidden.into_response();
    }

    let draft = match validated(draft) {
        Ok(draft) => draft,
        Err(errors) => return errors.into_response(),
    };

    match service.create_questionnaire(draft) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

fn assessment_error_response(err: AssessmentServiceError) -> Response {
    match err {
        AssessmentServiceError::QuestionnaireNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "Cuestionario no encontrado")
        }
        AssessmentServiceError::Repository(err) => {
            error!(error = %err, "assessment request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
