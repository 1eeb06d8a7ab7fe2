use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assessment::RiskLevel;
use crate::identity::UserId;

/// Data laid out in an individual risk report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRiskReport {
    pub user_id: UserId,
    pub user_name: String,
    pub department: String,
    pub risk_level: RiskLevel,
    pub total_score: u32,
    pub recommendations: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReportEntry {
    pub department: Option<String>,
    pub total_responses: usize,
}
