//! Field-level payload validation shared by the HTTP routers.
//!
//! Payload types derive [`validator::Validate`]; this module flattens the
//! crate's nested error tree into dotted `{field, message}` pairs and turns
//! body or path deserialization failures into the same 400 response.

use std::borrow::Cow;

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use validator::{Validate, ValidationError, ValidationErrorsKind};

/// One rejected field, addressed by its dotted path (`answers.2.value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = Self::new();
        flatten(&mut errors, None, &source);
        errors.errors.sort_by(|left, right| left.field.cmp(&right.field));
        errors
    }
}

fn flatten(into: &mut ValidationErrors, prefix: Option<&str>, source: &validator::ValidationErrors) {
    for (field, kind) in source.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => (*field).to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    into.push(path.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(into, Some(&path), nested),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(into, Some(&format!("{path}.{index}")), nested);
                }
            }
        }
    }
}

impl From<JsonRejection> for ValidationErrors {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        let field = rejected_field(&detail).unwrap_or_else(|| "body".to_string());
        Self::single(field, detail)
    }
}

impl From<PathRejection> for ValidationErrors {
    fn from(rejection: PathRejection) -> Self {
        Self::single("path", rejection.body_text())
    }
}

/// Dotted field path named by a serde error, e.g. ``answers[0].value: invalid type``
/// or ``missing field `questionnaireId` ``.
fn rejected_field(detail: &str) -> Option<String> {
    let detail = detail
        .split_once("target type: ")
        .map_or(detail, |(_, rest)| rest);
    let (location, error) = match detail.split_once(": ") {
        Some((location, error)) if !location.contains(' ') => (Some(location), error),
        _ => (None, detail),
    };
    let missing = error
        .split_once("field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(field, _)| field);
    let location = location.map(|location| location.replace('[', ".").replace(']', ""));

    match (location, missing) {
        (Some(location), Some(field)) => Some(format!("{location}.{field}")),
        (Some(location), None) => Some(location),
        (None, Some(field)) => Some(field.to_string()),
        (None, None) => None,
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        let payload = json!({
            "message": "Error de validación",
            "errors": self.errors,
        });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    }
}

/// Runs the derived field rules and keeps the value when they all pass.
pub fn validated<T: Validate>(value: T) -> Result<T, ValidationErrors> {
    match value.validate() {
        Ok(()) => Ok(value),
        Err(errors) => Err(errors.into()),
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed("Este campo es obligatorio"));
        return Err(error);
    }
    Ok(())
}

/// JSON body extractor whose rejections answer with the validation body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ValidationErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Path extractor whose rejections answer with the validation body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ValidationErrors;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
