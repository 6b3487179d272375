use serde::Serialize;

use crate::schemas::report::ReportResponse;
use crate::schemas::work_item::WorkItemResponse;

#[derive(Debug, Serialize)]
pub(crate) struct StudentDashboard {
    pub(crate) reports: Vec<ReportResponse>,
    pub(crate) tasks: Vec<WorkItemResponse>,
    pub(crate) projects: Vec<WorkItemResponse>,
    pub(crate) reports_count: i64,
    pub(crate) tasks_count: i64,
    pub(crate) projects_count: i64,
    /// Share of reports approved so far, 0..=100.
    pub(crate) completion_rate: f64,
    /// Reports filed against the weekly target, as a percentage.
    pub(crate) momentum_score: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct MentorStudentSummary {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) reports_count: i64,
    pub(crate) latest_report: Option<ReportResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MentorDashboard {
    pub(crate) option: String,
    pub(crate) students: Vec<MentorStudentSummary>,
    pub(crate) reports: Vec<ReportResponse>,
}

pub(crate) fn completion_rate(approved: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(approved as f64 / total as f64 * 100.0)
}

pub(crate) fn momentum_score(total: i64, weekly_target: u64) -> f64 {
    if weekly_target == 0 {
        return 0.0;
    }
    round2(total as f64 / weekly_target as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
