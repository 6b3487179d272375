use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::mentor::build_mentor_dashboard;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::{ReportStatus, UserRole};
use crate::repositories;
use crate::repositories::work_items::WorkItemKind;
use crate::schemas::dashboard::{completion_rate, momentum_score, StudentDashboard};
use crate::schemas::report::ReportResponse;
use crate::schemas::work_item::WorkItemResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Role-dependent landing payload: students get their own activity summary,
/// mentors get the view of their option.
async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    match user.role {
        UserRole::Student => {
            let payload = build_student_dashboard(&state, &user).await?;
            Ok(Json(payload).into_response())
        }
        UserRole::Mentor => {
            let profile = repositories::profiles::find_mentor_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?
                .ok_or(ApiError::Forbidden("Mentor profile missing"))?;
            let payload = build_mentor_dashboard(&state, &user, &profile).await?;
            Ok(Json(payload).into_response())
        }
    }
}

async fn build_student_dashboard(
    state: &AppState,
    user: &User,
) -> Result<StudentDashboard, ApiError> {
    let reports = repositories::reports::list_for_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reports"))?;
    let tasks = repositories::work_items::list_for_student(state.db(), WorkItemKind::Task, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tasks"))?;
    let projects =
        repositories::work_items::list_for_student(state.db(), WorkItemKind::Project, &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list projects"))?;

    let total = reports.len() as i64;
    let approved = repositories::reports::count_for_student_with_status(
        state.db(),
        &user.id,
        ReportStatus::Approved,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to count approved reports"))?;

    let weekly_target = state.settings().tracking().weekly_report_target;

    Ok(StudentDashboard {
        reports_count: total,
        tasks_count: tasks.len() as i64,
        projects_count: projects.len() as i64,
        completion_rate: completion_rate(approved, total),
        momentum_score: momentum_score(total, weekly_target),
        reports: reports.into_iter().map(ReportResponse::from_db).collect(),
        tasks: tasks.into_iter().map(|item| WorkItemResponse::from_db(item, Vec::new())).collect(),
        projects: projects
            .into_iter()
            .map(|item| WorkItemResponse::from_db(item, Vec::new()))
            .collect(),
    })
}
