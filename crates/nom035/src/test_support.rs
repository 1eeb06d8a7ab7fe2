use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::{Extension, Router};
use chrono::Utc;
use serde_json::Value;

use crate::assessment::{
    newest_first, Answer, NewQuestionnaire, NewSubmission, Question, QuestionId, Questionnaire,
    QuestionnaireId, QuestionnaireRepository, RepositoryError, Submission, SubmissionId,
    SubmissionRepository,
};
use crate::identity::{
    Authenticator, InMemoryTokenDenylist, NewUser, Role, TokenCodec, User, UserId,
    UserRepository,
};

pub(crate) const TEST_SECRET: &str = "unit-test-secret";

#[derive(Default, Clone)]
pub(crate) struct MemorySubmissions {
    pub(crate) records: Arc<Mutex<Vec<Submission>>>,
}

impl SubmissionRepository for MemorySubmissions {
    fn insert(&self, record: NewSubmission) -> Result<Submission, RepositoryError> {
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        let id = SubmissionId(guard.len() as u64 + 1);
        let stored = Submission::from_new(id, record);
        guard.push(stored.clone());
        Ok(stored)
    }

    fn latest_for_user(&self, user_id: UserId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.for_user(user_id)?.into_iter().next())
    }

    fn for_user(&self, user_id: UserId) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        let mut matching: Vec<Submission> = guard
            .iter()
            .filter(|submission| submission.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut matching);
        Ok(matching)
    }
}

pub(crate) struct UnavailableSubmissions;

impl SubmissionRepository for UnavailableSubmissions {
    fn insert(&self, _record: NewSubmission) -> Result<Submission, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_for_user(&self, _user_id: UserId) -> Result<Option<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _user_id: UserId) -> Result<Vec<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryQuestionnaires {
    records: Arc<Mutex<Vec<Questionnaire>>>,
}

impl QuestionnaireRepository for MemoryQuestionnaires {
    fn insert(&self, draft: NewQuestionnaire) -> Result<Questionnaire, RepositoryError> {
        let mut guard = self.records.lock().expect("questionnaire mutex poisoned");
        let id = QuestionnaireId(guard.len() as u64 + 1);
        let offset = guard.iter().map(|q| q.questions.len() as u64).sum::<u64>();
        let questionnaire = Questionnaire {
            id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            questions: draft
                .questions
                .into_iter()
                .enumerate()
                .map(|(index, question)| Question {
                    id: QuestionId(offset + index as u64 + 1),
                    questionnaire_id: id,
                    text: question.text,
                    category: question.category,
                })
                .collect(),
        };
        guard.push(questionnaire.clone());
        Ok(questionnaire)
    }

    fn fetch(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, RepositoryError> {
        let guard = self.records.lock().expect("questionnaire mutex poisoned");
        Ok(guard.iter().find(|q| q.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Questionnaire>, RepositoryError> {
        Ok(self.records.lock().expect("questionnaire mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryUsers {
    records: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MemoryUsers {
    /// Inserts a user with a placeholder hash, bypassing password hashing.
    pub(crate) fn seed(&self, name: &str, email: &str, role: Role, department: Option<&str>) -> User {
        self.insert(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role,
            department: department.map(str::to_string),
        })
        .expect("seed user")
    }
}

impl UserRepository for MemoryUsers {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = self.records.lock().expect("user mutex poisoned");
        if guard.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let id = UserId(guard.len() as u64 + 1);
        let stored = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            department: user.department,
        };
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.records.lock().expect("user mutex poisoned").get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.records.lock().expect("user mutex poisoned");
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    fn all(&self) -> Result<Vec<User>, RepositoryError> {
        let guard = self.records.lock().expect("user mutex poisoned");
        let mut users: Vec<User> = guard.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }
}

pub(crate) fn authenticator() -> Arc<Authenticator> {
    Arc::new(Authenticator::new(
        TokenCodec::new(TEST_SECRET, Duration::from_secs(3600)),
        Arc::new(InMemoryTokenDenylist::default()),
    ))
}

pub(crate) fn bearer(authenticator: &Authenticator, user: &User) -> String {
    let issued = authenticator
        .codec()
        .issue(user, Utc::now())
        .expect("token issued");
    format!("Bearer {}", issued.token)
}

pub(crate) fn with_auth(router: Router, authenticator: Arc<Authenticator>) -> Router {
    router.layer(Extension(authenticator))
}

pub(crate) fn answers(values: &[u8]) -> Vec<Answer> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Answer {
            question_id: QuestionId(index as u64 + 1),
            value: *value,
        })
        .collect()
}

pub(crate) fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(crate) fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) async fn read_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(crate) fn fixed_time_submission(user_id: UserId, total: u8, seconds: i64) -> NewSubmission {
    NewSubmission {
        user_id,
        questionnaire_id: QuestionnaireId(1),
        answers: answers(&[total]),
        risk_level: crate::assessment::RiskThresholds::default().classify(u32::from(total)),
        total_score: u32::from(total),
        created_at: chrono::DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(seconds),
    }
}

pub(crate) fn user(id: u64, role: Role) -> User {
    User {
        id: UserId(id),
        name: format!("Usuario {id}"),
        email: format!("user{id}@example.com"),
        password_hash: "unused".to_string(),
        role,
        department: None,
    }
}
