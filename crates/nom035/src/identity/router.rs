use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{LoginInput, RegisterInput};
use super::extract::AuthenticatedUser;
use super::repository::UserRepository;
use super::service::{IdentityError, IdentityService};
use crate::error::json_error;
use crate::validation::{validated, JsonBody};

/// Router builder exposing registration, login, logout and profile endpoints.
pub fn identity_router<U>(service: Arc<IdentityService<U>>) -> Router
where
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<U>))
        .route("/api/v1/auth/login", post(login_handler::<U>))
        .route("/api/v1/auth/logout", post(logout_handler::<U>))
        .route("/api/v1/auth/me", get(me_handler::<U>))
        .with_state(service)
}

pub(crate) async fn register_handler<U>(
    State(service): State<Arc<IdentityService<U>>>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Response
where
    U: UserRepository + 'static,
{
    let input = match validated(input) {
        Ok(input) => input,
        Err(errors) => return errors.into_response(),
    };

    match service.register(input).await {
        Ok(user) => (StatusCode::CREATED, Json(user.view())).into_response(),
        Err(err) => identity_error_response(err),
    }
}

pub(crate) async fn login_handler<U>(
    State(service): State<Arc<IdentityService<U>>>,
    JsonBody(input): JsonBody<LoginInput>,
) -> Response
where
    U: UserRepository + 'static,
{
    let input = match validated(input) {
        Ok(input) => input,
        Err(errors) => return errors.into_response(),
    };

    match service.login(input).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => identity_error_response(err),
    }
}

pub(crate) async fn logout_handler<U>(
    State(service): State<Arc<IdentityService<U>>>,
    caller: AuthenticatedUser,
) -> Response
where
    U: UserRepository + 'static,
{
    service.logout(&caller);
    (
        StatusCode::OK,
        Json(json!({ "message": "Sesión cerrada correctamente" })),
    )
        .into_response()
}

pub(crate) async fn me_handler<U>(
    State(service): State<Arc<IdentityService<U>>>,
    caller: AuthenticatedUser,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.profile(caller.id()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => identity_error_response(err),
    }
}

fn identity_error_response(err: IdentityError) -> Response {
    match err {
        IdentityError::EmailInUse => json_error(StatusCode::CONFLICT, err.to_string()),
        IdentityError::InvalidCredentials => json_error(StatusCode::UNAUTHORIZED, err.to_string()),
        IdentityError::UserNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "Usuario no encontrado")
        }
        other => {
            error!(error = %other, "identity request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
