use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use super::domain::UserId;
use super::token::{Authenticator, Claims};

/// Caller identity resolved from `Authorization: Bearer <token>`.
///
/// Requires an `Arc<Authenticator>` request extension installed by the server.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.claims.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    MissingToken,
    InvalidToken,
    NotConfigured,
}

impl AuthRejection {
    fn message(self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "Authorization header missing",
            AuthRejection::MissingToken => "Token missing",
            AuthRejection::InvalidToken => "Invalid or expired token",
            AuthRejection::NotConfigured => "authentication is not configured",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = match self {
            AuthRejection::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = parts
            .extensions
            .get::<Arc<Authenticator>>()
            .cloned()
            .ok_or_else(|| {
                error!("Authenticator extension missing from request");
                AuthRejection::NotConfigured
            })?;

        let raw = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthRejection::MissingHeader)?
            .to_str()
            .map_err(|_| AuthRejection::InvalidToken)?;

        let token = bearer_token(raw).ok_or(AuthRejection::MissingToken)?;

        let claims = authenticator.authenticate(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            AuthRejection::InvalidToken
        })?;

        Ok(Self {
            claims,
            token: token.to_string(),
        })
    }
}

/// Second whitespace-separated segment of the header, as in `Bearer <token>`.
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .split_whitespace()
        .nth(1)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_takes_second_segment() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
    }
}
