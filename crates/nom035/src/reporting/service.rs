use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::pdf::render_user_report;
use super::recommendations::recommendations_for;
use super::views::{DepartmentReportEntry, UserRiskReport};
use crate::assessment::SubmissionRepository;
use crate::error::RepositoryError;
use crate::identity::{UserId, UserRepository};

const DEFAULT_USER_NAME: &str = "Usuario";
const DEFAULT_DEPARTMENT: &str = "N/A";

/// Builds individual and departmental reports from stored submissions.
pub struct ReportService<S, U> {
    submissions: Arc<S>,
    users: Arc<U>,
}

impl<S, U> ReportService<S, U>
where
    S: SubmissionRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(submissions: Arc<S>, users: Arc<U>) -> Self {
        Self { submissions, users }
    }

    /// Report for the user's most recent submission, or `None` without one.
    pub fn user_report(&self, user_id: UserId) -> Result<Option<UserRiskReport>, ReportError> {
        let Some(submission) = self.submissions.latest_for_user(user_id)? else {
            return Ok(None);
        };

        let user = self.users.fetch(user_id)?;
        let user_name = user
            .as_ref()
            .map(|user| user.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
        let department = user
            .and_then(|user| user.department)
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        Ok(Some(UserRiskReport {
            user_id,
            user_name,
            department,
            risk_level: submission.risk_level,
            total_score: submission.total_score,
            recommendations: recommendations_for(submission.risk_level)
                .iter()
                .map(|item| item.to_string())
                .collect(),
            submitted_at: submission.created_at,
        }))
    }

    pub fn user_report_pdf(&self, user_id: UserId) -> Result<Option<Vec<u8>>, ReportError> {
        let Some(report) = self.user_report(user_id)? else {
            return Ok(None);
        };
        let document = render_user_report(&report);
        info!(
            user_id = user_id.0,
            risk_level = %report.risk_level,
            bytes = document.len(),
            "user report rendered"
        );
        Ok(Some(document))
    }

    /// Submission counts per department; users without a department group under `None`.
    pub fn department_reports(&self) -> Result<Vec<DepartmentReportEntry>, ReportError> {
        let mut totals: BTreeMap<Option<String>, usize> = BTreeMap::new();
        for user in self.users.all()? {
            let count = self.submissions.count_for_user(user.id)?;
            *totals.entry(user.department).or_default() += count;
        }

        Ok(totals
            .into_iter()
            .map(|(department, total_responses)| DepartmentReportEntry {
                department,
                total_responses,
            })
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
