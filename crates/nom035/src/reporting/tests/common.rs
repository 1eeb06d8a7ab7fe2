pub(super) use crate::test_support::*;

use std::sync::Arc;

use axum::Router;

use crate::identity::Authenticator;
use crate::reporting::{report_router, ReportService};

pub(super) struct Fixture {
    pub submissions: Arc<MemorySubmissions>,
    pub users: Arc<MemoryUsers>,
    pub service: Arc<ReportService<MemorySubmissions, MemoryUsers>>,
}

pub(super) fn fixture() -> Fixture {
    let submissions = Arc::new(MemorySubmissions::default());
    let users = Arc::new(MemoryUsers::default());
    let service = Arc::new(ReportService::new(submissions.clone(), users.clone()));
    Fixture {
        submissions,
        users,
        service,
    }
}

pub(super) fn router(fixture: &Fixture) -> (Router, Arc<Authenticator>) {
    let auth = authenticator();
    let router = with_auth(report_router(fixture.service.clone()), auth.clone());
    (router, auth)
}
