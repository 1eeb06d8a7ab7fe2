use crate::infra::Stores;
use crate::seed::seed_demo_data;
use clap::Args;
use nom035::assessment::{
    Answer, AssessmentService, QuestionId, QuestionnaireRepository, RiskScorer, RiskThresholds,
    SubmissionRequest,
};
use nom035::config::{AppConfig, ConfigError};
use nom035::error::AppError;
use nom035::identity::UserRepository;
use nom035::reporting::ReportService;
use std::path::PathBuf;

const DEMO_WORKER_EMAIL: &str = "juan@example.com";
const DEMO_ANSWERS: [u8; 8] = [4, 3, 2, 3, 4, 1, 2, 3];

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Comma-separated answer values between 0 and 5, e.g. 4,3,2
    #[arg(
        long,
        value_delimiter = ',',
        required = true,
        value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub(crate) answers: Vec<u8>,
    /// Override the configured lower bound of the MEDIUM band
    #[arg(long)]
    pub(crate) medium_from: Option<u32>,
    /// Override the configured lower bound of the HIGH band
    #[arg(long)]
    pub(crate) high_from: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the generated PDF report to this path.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let configured = AppConfig::load()?.scoring;
    let thresholds = resolve_thresholds(configured, args.medium_from, args.high_from)?;

    let answers: Vec<Answer> = args
        .answers
        .iter()
        .enumerate()
        .map(|(index, value)| Answer {
            question_id: QuestionId(index as u64 + 1),
            value: *value,
        })
        .collect();
    let score = RiskScorer::new(thresholds).score(&answers);

    println!(
        "Answers: {} | Total score: {} | Risk level: {}",
        answers.len(),
        score.total_score,
        score.risk_level
    );
    println!(
        "Bands: LOW < {} <= MEDIUM < {} <= HIGH",
        thresholds.medium_from(),
        thresholds.high_from()
    );
    Ok(())
}

fn demo_error(err: impl std::fmt::Display) -> AppError {
    AppError::Demo(err.to_string())
}

fn resolve_thresholds(
    configured: RiskThresholds,
    medium_from: Option<u32>,
    high_from: Option<u32>,
) -> Result<RiskThresholds, AppError> {
    let medium_from = medium_from.unwrap_or(configured.medium_from());
    let high_from = high_from.unwrap_or(configured.high_from());
    RiskThresholds::new(medium_from, high_from).ok_or_else(|| {
        AppError::Config(ConfigError::InvalidRiskThresholds {
            medium_from: u64::from(medium_from),
            high_from: u64::from(high_from),
        })
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let stores = Stores::default();
    seed_demo_data(&stores)?;

    let worker = stores
        .users
        .find_by_email(DEMO_WORKER_EMAIL)
        .map_err(demo_error)?
        .ok_or_else(|| AppError::Demo(format!("{DEMO_WORKER_EMAIL} missing from seed data")))?;
    let questionnaire = stores
        .questionnaires
        .all()
        .map_err(demo_error)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Demo("no questionnaire seeded".to_string()))?;

    let assessment = AssessmentService::new(
        stores.submissions.clone(),
        stores.questionnaires.clone(),
        RiskThresholds::default(),
    );
    let reports = ReportService::new(stores.submissions.clone(), stores.users.clone());

    println!("NOM-035 questionnaire demo");
    println!("Worker: {} <{}>", worker.name, worker.email);
    println!("Questionnaire: {}", questionnaire.title);

    let answers: Vec<Answer> = questionnaire
        .questions
        .iter()
        .zip(DEMO_ANSWERS)
        .map(|(question, value)| {
            println!("  [{value}] {}", question.text);
            Answer {
                question_id: question.id,
                value,
            }
        })
        .collect();

    let outcome = assessment
        .submit(
            worker.id,
            SubmissionRequest {
                questionnaire_id: questionnaire.id,
                answers,
            },
        )
        .map_err(demo_error)?;
    println!(
        "\nSubmission #{} | Total score: {} | Risk level: {}",
        outcome.response.id, outcome.total_score, outcome.risk_level
    );

    let report = reports
        .user_report(worker.id)
        .map_err(demo_error)?
        .ok_or_else(|| AppError::Demo("report missing after submission".to_string()))?;
    println!("Department: {}", report.department);
    println!("Recommendations:");
    for recommendation in &report.recommendations {
        println!("  - {recommendation}");
    }

    if let Some(path) = args.output {
        let document = reports
            .user_report_pdf(worker.id)
            .map_err(demo_error)?
            .ok_or_else(|| AppError::Demo("report missing after submission".to_string()))?;
        std::fs::write(&path, &document)?;
        println!("\nPDF report written to {} ({} bytes)", path.display(), document.len());
    }

    Ok(())
}
