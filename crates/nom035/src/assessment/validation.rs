use serde::{Deserialize, Serialize};
use validator::Validate;

use super::domain::{Answer, QuestionId, QuestionnaireId, SubmissionRequest};
use crate::validation::{validated, ValidationErrors};

/// Raw submission body as received over HTTP, before range checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsePayload {
    pub questionnaire_id: u64,
    #[serde(default)]
    #[validate(length(min = 1, message = "Debe enviar al menos una respuesta"))]
    #[validate]
    pub answers: Vec<AnswerPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question_id: u64,
    #[validate(range(min = 0, max = 5, message = "El valor debe estar entre 0 y 5"))]
    pub value: i64,
}

impl SubmitResponsePayload {
    /// Checks the payload and converts it into a scorable request.
    pub fn into_request(self) -> Result<SubmissionRequest, ValidationErrors> {
        let payload = validated(self)?;
        let answers = payload
            .answers
            .iter()
            .filter_map(|answer| {
                u8::try_from(answer.value).ok().map(|value| Answer {
                    question_id: QuestionId(answer.question_id),
                    value,
                })
            })
            .collect();

        Ok(SubmissionRequest {
            questionnaire_id: QuestionnaireId(payload.questionnaire_id),
            answers,
        })
    }
}
