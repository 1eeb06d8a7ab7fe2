//! End-to-end scenarios for registering, answering a questionnaire and reading the resulting
//! reports through the public routers.

mod common {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{Extension, Router};

    use nom035::assessment::{
        assessment_router, newest_first, AssessmentService, NewQuestionnaire, NewSubmission,
        Question, QuestionId, Questionnaire, QuestionnaireId, QuestionnaireRepository,
        RepositoryError, RiskThresholds, Submission, SubmissionId, SubmissionRepository,
    };
    use nom035::identity::{
        identity_router, Authenticator, IdentityService, InMemoryTokenDenylist, NewUser,
        TokenCodec, User, UserId, UserRepository,
    };
    use nom035::reporting::{report_router, ReportService};

    #[derive(Default)]
    pub(super) struct Submissions {
        next_id: AtomicU64,
        records: Mutex<Vec<Submission>>,
    }

    impl SubmissionRepository for Submissions {
        fn insert(&self, record: NewSubmission) -> Result<Submission, RepositoryError> {
            let id = SubmissionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            let stored = Submission::from_new(id, record);
            self.records.lock().expect("lock").push(stored.clone());
            Ok(stored)
        }

        fn latest_for_user(&self, user_id: UserId) -> Result<Option<Submission>, RepositoryError> {
            Ok(self.for_user(user_id)?.into_iter().next())
        }

        fn for_user(&self, user_id: UserId) -> Result<Vec<Submission>, RepositoryError> {
            let mut matching: Vec<Submission> = self
                .records
                .lock()
                .expect("lock")
                .iter()
                .filter(|record| record.user_id == user_id)
                .cloned()
                .collect();
            newest_first(&mut matching);
            Ok(matching)
        }
    }

    #[derive(Default)]
    pub(super) struct Questionnaires {
        records: Mutex<Vec<Questionnaire>>,
    }

    impl QuestionnaireRepository for Questionnaires {
        fn insert(&self, draft: NewQuestionnaire) -> Result<Questionnaire, RepositoryError> {
            let mut records = self.records.lock().expect("lock");
            let id = QuestionnaireId(records.len() as u64 + 1);
            let questionnaire = Questionnaire {
                id,
                title: draft.title,
                description: draft.description.unwrap_or_default(),
                questions: draft
                    .questions
                    .into_iter()
                    .enumerate()
                    .map(|(index, question)| Question {
                        id: QuestionId(index as u64 + 1),
                        questionnaire_id: id,
                        text: question.text,
                        category: question.category,
                    })
                    .collect(),
            };
            records.push(questionnaire.clone());
            Ok(questionnaire)
        }

        fn fetch(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .find(|questionnaire| questionnaire.id == id)
                .cloned())
        }

        fn all(&self) -> Result<Vec<Questionnaire>, RepositoryError> {
            Ok(self.records.lock().expect("lock").clone())
        }
    }

    #[derive(Default)]
    pub(super) struct Users {
        records: Mutex<Vec<User>>,
    }

    impl UserRepository for Users {
        fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
            let mut records = self.records.lock().expect("lock");
            if records.iter().any(|existing| existing.email == user.email) {
                return Err(RepositoryError::Conflict);
            }
            let stored = User {
                id: UserId(records.len() as u64 + 1),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                department: user.department,
            };
            records.push(stored.clone());
            Ok(stored)
        }

        fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .find(|user| user.id == id)
                .cloned())
        }

        fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .find(|user| user.email == email)
                .cloned())
        }

        fn all(&self) -> Result<Vec<User>, RepositoryError> {
            Ok(self.records.lock().expect("lock").clone())
        }
    }

    pub(super) fn application() -> Router {
        let submissions = Arc::new(Submissions::default());
        let questionnaires = Arc::new(Questionnaires::default());
        let users = Arc::new(Users::default());
        let authenticator = Arc::new(Authenticator::new(
            TokenCodec::new("integration-secret", Duration::from_secs(600)),
            Arc::new(InMemoryTokenDenylist::default()),
        ));

        let identity = Arc::new(IdentityService::new(users.clone(), authenticator.clone()));
        let assessment = Arc::new(AssessmentService::new(
            submissions.clone(),
            questionnaires,
            RiskThresholds::default(),
        ));
        let reports = Arc::new(ReportService::new(submissions, users));

        Router::new()
            .merge(identity_router(identity))
            .merge(assessment_router(assessment))
            .merge(report_router(reports))
            .layer(Extension(authenticator))
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(router: &Router, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request builds");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body readable");
    (status, bytes.to_vec())
}

async fn register_and_login(router: &Router, email: &str, role: &str, department: Option<&str>) -> (u64, String) {
    let (status, body) = send(
        router,
        "POST",
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Persona de prueba",
            "email": email,
            "password": "password123",
            "role": role,
            "department": department,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let view: Value = serde_json::from_slice(&body).expect("user view");

    let (status, body) = send(
        router,
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": email, "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login: Value = serde_json::from_slice(&body).expect("login body");

    (
        view["id"].as_u64().expect("user id"),
        login["token"].as_str().expect("token").to_string(),
    )
}

#[tokio::test]
async fn worker_submission_flows_into_reports() {
    let router = common::application();
    let (admin_id, admin_token) =
        register_and_login(&router, "admin@example.com", "ADMIN", None).await;
    let (worker_id, worker_token) =
        register_and_login(&router, "juan@example.com", "WORKER", Some("Operaciones")).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/questionnaires",
        Some(&admin_token),
        json!({
            "title": "Guía de referencia II",
            "questions": [
                { "text": "¿Su trabajo es peligroso?", "category": "Ambiente de trabajo" },
                { "text": "¿Tiene tiempo para descansar?", "category": "Jornada de trabajo" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let questionnaire: Value = serde_json::from_slice(&body).expect("questionnaire");

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/responses",
        Some(&worker_token),
        json!({
            "questionnaireId": questionnaire["id"],
            "answers": [
                { "questionId": 1, "value": 5 },
                { "questionId": 2, "value": 5 },
                { "questionId": 1, "value": 5 },
                { "questionId": 2, "value": 5 },
                { "questionId": 1, "value": 4 }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let outcome: Value = serde_json::from_slice(&body).expect("outcome");
    assert_eq!(outcome["totalScore"], 24);
    assert_eq!(outcome["riskLevel"], "HIGH");

    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/v1/reports/user/{worker_id}/summary"),
        Some(&worker_token),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_slice(&body).expect("summary");
    assert_eq!(summary["department"], "Operaciones");
    assert_eq!(summary["recommendations"][0], "Buscar apoyo psicológico");

    let (status, _) = send(
        &router,
        "GET",
        &format!("/api/v1/reports/user/{admin_id}"),
        Some(&worker_token),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &router,
        "GET",
        "/api/v1/reports/department",
        Some(&admin_token),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let departments: Value = serde_json::from_slice(&body).expect("departments");
    assert_eq!(
        departments,
        json!([
            { "department": null, "totalResponses": 0 },
            { "department": "Operaciones", "totalResponses": 1 }
        ])
    );
}

#[tokio::test]
async fn logout_invalidates_the_session_across_routers() {
    let router = common::application();
    let (_, token) = register_and_login(&router, "ana@example.com", "WORKER", None).await;

    let (status, _) = send(&router, "POST", "/api/v1/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/responses",
        Some(&token),
        json!({ "questionnaireId": 1, "answers": [{ "questionId": 1, "value": 1 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let payload: Value = serde_json::from_slice(&body).expect("error body");
    assert_eq!(payload["message"], "Invalid or expired token");
}
