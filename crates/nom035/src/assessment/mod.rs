//! Questionnaire catalogue, risk scoring and the response-submission pipeline.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, NewQuestion, NewQuestionnaire, NewSubmission, Question, QuestionId, Questionnaire,
    QuestionnaireId, RiskLevel, Submission, SubmissionId, SubmissionOutcome, SubmissionRequest,
};
pub use repository::{newest_first, QuestionnaireRepository, RepositoryError, SubmissionRepository};
pub use router::assessment_router;
pub use scoring::{RiskScore, RiskScorer, RiskThresholds};
pub use service::{AssessmentService, AssessmentServiceError};
pub use validation::{AnswerPayload, SubmitResponsePayload};
