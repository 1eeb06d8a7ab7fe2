use metrics_exporter_prometheus::PrometheusHandle;
use nom035::assessment::{
    newest_first, NewQuestionnaire, NewSubmission, Question, QuestionId, Questionnaire,
    QuestionnaireId, QuestionnaireRepository, RepositoryError, Submission, SubmissionId,
    SubmissionRepository,
};
use nom035::identity::{NewUser, User, UserId, UserRepository};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Default)]
pub(crate) struct InMemorySubmissionRepository {
    sequence: AtomicU64,
    records: Mutex<Vec<Submission>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: NewSubmission) -> Result<Submission, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = Submission::from_new(SubmissionId(next_id(&self.sequence)), record);
        guard.push(stored.clone());
        Ok(stored)
    }

    fn latest_for_user(&self, user_id: UserId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.for_user(user_id)?.into_iter().next())
    }

    fn for_user(&self, user_id: UserId) -> Result<Vec<Submission>, RepositoryError> {
        let mut matching: Vec<Submission> = lock(&self.records)?
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut matching);
        Ok(matching)
    }

    fn count_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError> {
        Ok(lock(&self.records)?
            .iter()
            .filter(|record| record.user_id == user_id)
            .count())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryQuestionnaireRepository {
    questionnaire_sequence: AtomicU64,
    question_sequence: AtomicU64,
    records: Mutex<BTreeMap<QuestionnaireId, Questionnaire>>,
}

impl QuestionnaireRepository for InMemoryQuestionnaireRepository {
    fn insert(&self, draft: NewQuestionnaire) -> Result<Questionnaire, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let id = QuestionnaireId(next_id(&self.questionnaire_sequence));
        let questions = draft
            .questions
            .into_iter()
            .map(|question| Question {
                id: QuestionId(next_id(&self.question_sequence)),
                questionnaire_id: id,
                text: question.text,
                category: question.category,
            })
            .collect();
        let questionnaire = Questionnaire {
            id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            questions,
        };
        guard.insert(id, questionnaire.clone());
        Ok(questionnaire)
    }

    fn fetch(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Questionnaire>, RepositoryError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    sequence: AtomicU64,
    records: Mutex<BTreeMap<UserId, User>>,
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let stored = User {
            id: UserId(next_id(&self.sequence)),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            department: user.department,
        };
        guard.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.records)?.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    fn all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

/// Stores shared by the services of one process.
#[derive(Clone, Default)]
pub(crate) struct Stores {
    pub(crate) users: Arc<InMemoryUserRepository>,
    pub(crate) submissions: Arc<InMemorySubmissionRepository>,
    pub(crate) questionnaires: Arc<InMemoryQuestionnaireRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nom035::assessment::{Answer, RiskLevel};
    use nom035::identity::Role;

    fn submission(user_id: UserId, seconds: i64) -> NewSubmission {
        NewSubmission {
            user_id,
            questionnaire_id: QuestionnaireId(1),
            answers: vec![Answer {
                question_id: QuestionId(1),
                value: 3,
            }],
            risk_level: RiskLevel::Low,
            total_score: 3,
            created_at: Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp"),
        }
    }

    #[test]
    fn submissions_receive_distinct_ids_and_sort_newest_first() {
        let repository = InMemorySubmissionRepository::default();
        let first = repository.insert(submission(UserId(1), 10)).expect("insert");
        let second = repository.insert(submission(UserId(1), 10)).expect("insert");
        let third = repository.insert(submission(UserId(1), 5)).expect("insert");
        repository.insert(submission(UserId(2), 50)).expect("insert");

        assert_ne!(first.id, second.id);
        let ids: Vec<_> = repository
            .for_user(UserId(1))
            .expect("history")
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id, third.id]);
        assert_eq!(repository.count_for_user(UserId(1)).expect("count"), 3);
    }

    #[test]
    fn user_emails_are_unique() {
        let repository = InMemoryUserRepository::default();
        let user = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Worker,
            department: None,
        };

        repository.insert(user.clone()).expect("first insert");
        assert!(matches!(
            repository.insert(user),
            Err(RepositoryError::Conflict)
        ));
    }
}
