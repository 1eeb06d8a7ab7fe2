use super::domain::{NewQuestionnaire, NewSubmission, Questionnaire, QuestionnaireId, Submission};
pub use crate::error::RepositoryError;
use crate::identity::UserId;

/// Storage abstraction for questionnaire responses.
///
/// Implementations assign identifiers; a single `insert` must be atomic.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: NewSubmission) -> Result<Submission, RepositoryError>;
    /// Most recent submission by `created_at`, ties resolved by the higher id.
    fn latest_for_user(&self, user_id: UserId) -> Result<Option<Submission>, RepositoryError>;
    /// All submissions of a user, newest first.
    fn for_user(&self, user_id: UserId) -> Result<Vec<Submission>, RepositoryError>;
    fn count_for_user(&self, user_id: UserId) -> Result<usize, RepositoryError> {
        Ok(self.for_user(user_id)?.len())
    }
}

/// Storage abstraction for the questionnaire catalogue.
pub trait QuestionnaireRepository: Send + Sync {
    fn insert(&self, draft: NewQuestionnaire) -> Result<Questionnaire, RepositoryError>;
    fn fetch(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, RepositoryError>;
    fn all(&self) -> Result<Vec<Questionnaire>, RepositoryError>;
}

/// Newest-first ordering used by repositories that hold submissions in memory.
pub fn newest_first(submissions: &mut [Submission]) {
    submissions.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}
