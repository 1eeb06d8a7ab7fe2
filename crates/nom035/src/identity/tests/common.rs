pub(super) use crate::test_support::*;

use std::sync::Arc;

use axum::Router;

use crate::identity::{identity_router, IdentityService, RegisterInput, Role};

pub(super) fn service() -> (Arc<MemoryUsers>, IdentityService<MemoryUsers>) {
    let users = Arc::new(MemoryUsers::default());
    let service = IdentityService::new(users.clone(), authenticator());
    (users, service)
}

pub(super) fn router() -> (Arc<MemoryUsers>, Router) {
    let (users, service) = service();
    let auth = service.authenticator().clone();
    let router = with_auth(identity_router(Arc::new(service)), auth);
    (users, router)
}

pub(super) fn registration(email: &str) -> RegisterInput {
    RegisterInput {
        name: "Juan Pérez".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        role: Role::Worker,
        department: Some("Operaciones".to_string()),
    }
}
