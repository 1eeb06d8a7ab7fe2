use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    NewQuestionnaire, NewSubmission, Questionnaire, QuestionnaireId, Submission,
    SubmissionOutcome, SubmissionRequest,
};
use super::repository::{QuestionnaireRepository, RepositoryError, SubmissionRepository};
use super::scoring::{RiskScorer, RiskThresholds};
use crate::identity::UserId;

/// Service composing the risk scorer with the submission and questionnaire stores.
pub struct AssessmentService<S, Q> {
    submissions: Arc<S>,
    questionnaires: Arc<Q>,
    scorer: RiskScorer,
}

impl<S, Q> AssessmentService<S, Q>
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    pub fn new(submissions: Arc<S>, questionnaires: Arc<Q>, thresholds: RiskThresholds) -> Self {
        Self {
            submissions,
            questionnaires,
            scorer: RiskScorer::new(thresholds),
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Score an already validated submission, persist it and echo the result.
    ///
    /// Every call stores a new record; nothing is merged with earlier submissions.
    pub fn submit(
        &self,
        user_id: UserId,
        request: SubmissionRequest,
    ) -> Result<SubmissionOutcome, AssessmentServiceError> {
        let score = self.scorer.score(&request.answers);

        let record = NewSubmission {
            user_id,
            questionnaire_id: request.questionnaire_id,
            answers: request.answers,
            risk_level: score.risk_level,
            total_score: score.total_score,
            created_at: Utc::now(),
        };

        let stored = self.submissions.insert(record).map_err(|err| {
            warn!(user_id = user_id.0, error = %err, "failed to persist submission");
            err
        })?;

        info!(
            submission_id = stored.id.0,
            user_id = user_id.0,
            questionnaire_id = stored.questionnaire_id.0,
            total_score = score.total_score,
            risk_level = %score.risk_level,
            "questionnaire submission recorded"
        );

        Ok(SubmissionOutcome {
            response: stored,
            total_score: score.total_score,
            risk_level: score.risk_level,
        })
    }

    pub fn latest_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Submission>, AssessmentServiceError> {
        Ok(self.submissions.latest_for_user(user_id)?)
    }

    pub fn history_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Submission>, AssessmentServiceError> {
        Ok(self.submissions.for_user(user_id)?)
    }

    pub fn questionnaires(&self) -> Result<Vec<Questionnaire>, AssessmentServiceError> {
        Ok(self.questionnaires.all()?)
    }

    pub fn questionnaire(
        &self,
        id: QuestionnaireId,
    ) -> Result<Questionnaire, AssessmentServiceError> {
        self.questionnaires
            .fetch(id)?
            .ok_or(AssessmentServiceError::QuestionnaireNotFound(id))
    }

    pub fn create_questionnaire(
        &self,
        draft: NewQuestionnaire,
    ) -> Result<Questionnaire, AssessmentServiceError> {
        let created = self.questionnaires.insert(draft)?;
        info!(
            questionnaire_id = created.id.0,
            questions = created.questions.len(),
            "questionnaire created"
        );
        Ok(created)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("questionnaire {0} not found")]
    QuestionnaireNotFound(QuestionnaireId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
