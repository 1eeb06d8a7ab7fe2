use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::identity::UserId;
use crate::validation::non_blank;

/// Identifier of a questionnaire in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionnaireId(pub u64);

/// Identifier of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

/// Identifier assigned by the persistence layer to a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

impl fmt::Display for QuestionnaireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One answered question. Values are expected in `0..=5` once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    pub value: u8,
}

/// Discrete psychosocial risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated submission payload handed to the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub questionnaire_id: QuestionnaireId,
    pub answers: Vec<Answer>,
}

/// Record handed to the repository; the repository assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub questionnaire_id: QuestionnaireId,
    pub answers: Vec<Answer>,
    pub risk_level: RiskLevel,
    pub total_score: u32,
    pub created_at: DateTime<Utc>,
}

/// Persisted questionnaire response. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub questionnaire_id: QuestionnaireId,
    pub answers: Vec<Answer>,
    pub risk_level: RiskLevel,
    pub total_score: u32,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn from_new(id: SubmissionId, record: NewSubmission) -> Self {
        Self {
            id,
            user_id: record.user_id,
            questionnaire_id: record.questionnaire_id,
            answers: record.answers,
            risk_level: record.risk_level,
            total_score: record.total_score,
            created_at: record.created_at,
        }
    }
}

/// Result returned to the submitting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub response: Submission,
    pub total_score: u32,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub questionnaire_id: QuestionnaireId,
    pub text: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Question text and category supplied when authoring a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewQuestion {
    #[validate(custom = "non_blank")]
    pub text: String,
    #[validate(custom = "non_blank")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewQuestionnaire {
    #[validate(custom = "non_blank")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Debe haber al menos una pregunta"))]
    #[validate]
    pub questions: Vec<NewQuestion>,
}
