use crate::infra::Stores;
use nom035::assessment::{NewQuestion, NewQuestionnaire, QuestionnaireRepository};
use nom035::error::AppError;
use nom035::identity::password::hash_password;
use nom035::identity::{NewUser, Role, UserRepository};
use tracing::info;

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    department: &'static str,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        name: "Administrador",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
        department: "Dirección",
    },
    SeedUser {
        name: "Juan Pérez",
        email: "juan@example.com",
        password: "password123",
        role: Role::Worker,
        department: "Recursos Humanos",
    },
    SeedUser {
        name: "María Gómez",
        email: "maria@example.com",
        password: "password123",
        role: Role::Worker,
        department: "Operaciones",
    },
    SeedUser {
        name: "Carlos Rodríguez",
        email: "carlos@example.com",
        password: "password123",
        role: Role::Worker,
        department: "Ventas",
    },
    SeedUser {
        name: "Ana López",
        email: "ana@example.com",
        password: "password123",
        role: Role::Worker,
        department: "Finanzas",
    },
];

const PSYCHOSOCIAL_QUESTIONS: &[(&str, &str)] = &[
    ("¿Mi trabajo me exige hacer mucho esfuerzo físico?", "Condiciones en el ambiente de trabajo"),
    ("¿Me preocupa sufrir un accidente en mi trabajo?", "Condiciones en el ambiente de trabajo"),
    ("¿Considero que las actividades que realizo son peligrosas?", "Condiciones en el ambiente de trabajo"),
    ("¿Por la cantidad de trabajo que tengo debo quedarme tiempo adicional a mi turno?", "Carga de trabajo"),
    ("¿Tengo que trabajar muy rápido?", "Carga de trabajo"),
    ("¿Mi trabajo permite que desarrolle nuevas habilidades?", "Falta de control sobre el trabajo"),
    ("¿Puedo decidir cuánto trabajo realizo durante la jornada laboral?", "Falta de control sobre el trabajo"),
    ("¿Recibo capacitación útil para hacer mi trabajo?", "Falta de control sobre el trabajo"),
];

const CLIMATE_QUESTIONS: &[(&str, &str)] = &[
    ("¿Me siento parte de un equipo de trabajo?", "Pertenencia"),
    ("¿Mi jefe inmediato se interesa por mi bienestar?", "Liderazgo"),
    ("¿En mi trabajo puedo expresar mis opiniones sin represalias?", "Comunicación"),
    ("¿Recibo reconocimiento por mi desempeño?", "Motivación"),
    ("¿Tengo oportunidades de crecimiento en esta empresa?", "Desarrollo profesional"),
];

fn questionnaire(title: &str, description: &str, questions: &[(&str, &str)]) -> NewQuestionnaire {
    NewQuestionnaire {
        title: title.to_string(),
        description: Some(description.to_string()),
        questions: questions
            .iter()
            .map(|(text, category)| NewQuestion {
                text: text.to_string(),
                category: category.to_string(),
            })
            .collect(),
    }
}

/// Loads the demo accounts and the NOM-035 questionnaires into empty stores.
pub(crate) fn seed_demo_data(stores: &Stores) -> Result<(), AppError> {
    for user in USERS {
        let password_hash =
            hash_password(user.password).map_err(|err| AppError::Seed(err.to_string()))?;
        stores
            .users
            .insert(NewUser {
                name: user.name.to_string(),
                email: user.email.to_string(),
                password_hash,
                role: user.role,
                department: Some(user.department.to_string()),
            })
            .map_err(|err| AppError::Seed(format!("{}: {err}", user.email)))?;
    }

    for draft in [
        questionnaire(
            "Evaluación de Factores de Riesgo Psicosocial",
            "Cuestionario para evaluar factores psicosociales según la NOM-035",
            PSYCHOSOCIAL_QUESTIONS,
        ),
        questionnaire(
            "Evaluación de Clima Laboral",
            "Cuestionario para evaluar el ambiente y clima laboral en la organización",
            CLIMATE_QUESTIONS,
        ),
    ] {
        stores
            .questionnaires
            .insert(draft)
            .map_err(|err| AppError::Seed(err.to_string()))?;
    }

    info!(
        users = USERS.len(),
        questionnaires = 2,
        "demo data seeded"
    );
    Ok(())
}
