use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use super::domain::{Role, UserId};
use super::extract::AuthenticatedUser;
use crate::error::json_error;

/// Operations gated behind authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SubmitResponses,
    ViewOwnReports,
    ViewAnyReport,
    ViewDepartmentReports,
    ManageQuestionnaires,
}

const WORKER_CAPABILITIES: &[Capability] =
    &[Capability::SubmitResponses, Capability::ViewOwnReports];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::SubmitResponses,
    Capability::ViewOwnReports,
    Capability::ViewAnyReport,
    Capability::ViewDepartmentReports,
    Capability::ManageQuestionnaires,
];

impl Role {
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::Worker => WORKER_CAPABILITIES,
        }
    }

    pub fn grants(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Acceso denegado: {role:?} lacks {capability:?}")]
pub struct Forbidden {
    pub role: Role,
    pub capability: Capability,
}

impl IntoResponse for Forbidden {
    fn into_response(self) -> Response {
        warn!(role = self.role.label(), capability = ?self.capability, "request denied");
        json_error(StatusCode::FORBIDDEN, "Acceso denegado")
    }
}

impl AuthenticatedUser {
    pub fn authorize(&self, capability: Capability) -> Result<(), Forbidden> {
        if self.claims.role.grants(capability) {
            Ok(())
        } else {
            Err(Forbidden {
                role: self.claims.role,
                capability,
            })
        }
    }

    /// Access to data owned by `owner`: own data needs `ViewOwnReports`, anyone else's `ViewAnyReport`.
    pub fn authorize_owner(&self, owner: UserId) -> Result<(), Forbidden> {
        if owner == self.claims.id {
            self.authorize(Capability::ViewOwnReports)
        } else {
            self.authorize(Capability::ViewAnyReport)
        }
    }
}
