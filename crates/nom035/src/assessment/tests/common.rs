pub(super) use crate::test_support::*;

use std::sync::Arc;

use axum::Router;

use crate::assessment::{
    assessment_router, AssessmentService, NewQuestion, NewQuestionnaire, QuestionnaireRepository,
    RiskThresholds, SubmissionRepository,
};

pub(super) type MemoryService = AssessmentService<MemorySubmissions, MemoryQuestionnaires>;

pub(super) fn service() -> (Arc<MemorySubmissions>, Arc<MemoryQuestionnaires>, MemoryService) {
    let submissions = Arc::new(MemorySubmissions::default());
    let questionnaires = Arc::new(MemoryQuestionnaires::default());
    let service = AssessmentService::new(
        submissions.clone(),
        questionnaires.clone(),
        RiskThresholds::default(),
    );
    (submissions, questionnaires, service)
}

pub(super) fn workplace_draft() -> NewQuestionnaire {
    NewQuestionnaire {
        title: "Cuestionario NOM-035".to_string(),
        description: Some("Factores de riesgo psicosocial".to_string()),
        questions: vec![
            NewQuestion {
                text: "¿Su trabajo le exige hacer mucho esfuerzo físico?".to_string(),
                category: "Ambiente de trabajo".to_string(),
            },
            NewQuestion {
                text: "¿Trabaja horas extras más de tres veces a la semana?".to_string(),
                category: "Jornada de trabajo".to_string(),
            },
        ],
    }
}

pub(super) fn router_with<S, Q>(service: AssessmentService<S, Q>) -> (Router, Arc<crate::identity::Authenticator>)
where
    S: SubmissionRepository + 'static,
    Q: QuestionnaireRepository + 'static,
{
    let auth = authenticator();
    let router = with_auth(assessment_router(Arc::new(service)), auth.clone());
    (router, auth)
}
