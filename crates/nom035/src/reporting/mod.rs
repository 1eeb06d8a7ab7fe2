//! Recommendations, per-user PDF reports and department aggregates.

pub mod pdf;
pub mod recommendations;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use pdf::render_user_report;
pub use recommendations::recommendations_for;
pub use router::report_router;
pub use service::{ReportError, ReportService};
pub use views::{DepartmentReportEntry, UserRiskReport};
