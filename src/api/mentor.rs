use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentMentor;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{MentorProfile, User};
use crate::repositories;
use crate::repositories::work_items::{AssignError, WorkItemKind};
use crate::schemas::dashboard::{MentorDashboard, MentorStudentSummary};
use crate::schemas::report::ReportResponse;
use crate::schemas::work_item::{WorkItemCreate, WorkItemResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/projects", get(list_projects).post(create_project))
}

async fn dashboard(
    State(state): State<AppState>,
    CurrentMentor(user, profile): CurrentMentor,
) -> Result<Json<MentorDashboard>, ApiError> {
    let response = build_mentor_dashboard(&state, &user, &profile).await?;
    Ok(Json(response))
}

/// The mentor's view of their option: students with report counts and latest
/// reports, plus the full report feed. Shared with the role-dispatching
/// dashboard endpoint.
pub(crate) async fn build_mentor_dashboard(
    state: &AppState,
    _user: &User,
    profile: &MentorProfile,
) -> Result<MentorDashboard, ApiError> {
    let option = repositories::options::find_by_id(state.db(), &profile.option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load option"))?
        .ok_or_else(|| ApiError::NotFound("Option not found".to_string()))?;

    let students = repositories::users::list_students_for_option(state.db(), &option.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    let mut summaries = Vec::with_capacity(students.len());
    for student in students {
        let reports_count = repositories::reports::count_for_student(state.db(), &student.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count reports"))?;
        let latest = repositories::reports::list_for_student(state.db(), &student.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list reports"))?
            .into_iter()
            .next()
            .map(ReportResponse::from_db);

        summaries.push(MentorStudentSummary {
            id: student.id,
            username: student.username,
            first_name: student.first_name,
            last_name: student.last_name,
            reports_count,
            latest_report: latest,
        });
    }

    let reports = repositories::reports::list_for_option(state.db(), &option.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reports"))?
        .into_iter()
        .map(ReportResponse::from_db)
        .collect();

    Ok(MentorDashboard { option: option.name, students: summaries, reports })
}

async fn list_tasks(
    State(state): State<AppState>,
    CurrentMentor(user, _profile): CurrentMentor,
) -> Result<Json<Vec<WorkItemResponse>>, ApiError> {
    list_work_items(&state, WorkItemKind::Task, &user.id).await.map(Json)
}

async fn list_projects(
    State(state): State<AppState>,
    CurrentMentor(user, _profile): CurrentMentor,
) -> Result<Json<Vec<WorkItemResponse>>, ApiError> {
    list_work_items(&state, WorkItemKind::Project, &user.id).await.map(Json)
}

async fn create_task(
    State(state): State<AppState>,
    CurrentMentor(user, profile): CurrentMentor,
    Json(payload): Json<WorkItemCreate>,
) -> Result<(StatusCode, Json<WorkItemResponse>), ApiError> {
    create_work_item(&state, WorkItemKind::Task, &user, &profile, payload).await
}

async fn create_project(
    State(state): State<AppState>,
    CurrentMentor(user, profile): CurrentMentor,
    Json(payload): Json<WorkItemCreate>,
) -> Result<(StatusCode, Json<WorkItemResponse>), ApiError> {
    create_work_item(&state, WorkItemKind::Project, &user, &profile, payload).await
}

async fn create_work_item(
    state: &AppState,
    kind: WorkItemKind,
    user: &User,
    profile: &MentorProfile,
    payload: WorkItemCreate,
) -> Result<(StatusCode, Json<WorkItemResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }
    if payload.student_ids.is_empty() {
        return Err(ApiError::BadRequest("Select at least one student".to_string()));
    }

    let now = primitive_now_utc();
    let item = repositories::work_items::create_with_assignments(
        state.db(),
        kind,
        repositories::work_items::CreateWorkItem {
            id: &Uuid::new_v4().to_string(),
            name: &payload.name,
            content: &payload.content,
            due_date: payload.due_date,
            option_id: &profile.option_id,
            mentor_id: &user.id,
            created_at: now,
        },
        &payload.student_ids,
    )
    .await
    .map_err(|e| match e {
        AssignError::StudentOutsideOption => {
            ApiError::BadRequest("All selected students must belong to your option".to_string())
        }
        AssignError::Db(err) => ApiError::internal(err, "Failed to create assignment"),
    })?;

    let label = match kind {
        WorkItemKind::Task => "task",
        WorkItemKind::Project => "project",
    };
    for student_id in &payload.student_ids {
        repositories::notifications::create(
            state.db(),
            &Uuid::new_v4().to_string(),
            student_id,
            &format!("New {label} assigned: {}", item.name),
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create notification"))?;
    }

    Ok((StatusCode::CREATED, Json(WorkItemResponse::from_db(item, payload.student_ids))))
}

async fn list_work_items(
    state: &AppState,
    kind: WorkItemKind,
    mentor_id: &str,
) -> Result<Vec<WorkItemResponse>, ApiError> {
    let items = repositories::work_items::list_for_mentor(state.db(), kind, mentor_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list work items"))?;

    let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
    let assignments = repositories::work_items::list_assignees(state.db(), kind, &item_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignees"))?;

    let mut by_item: HashMap<String, Vec<String>> = HashMap::new();
    for (item_id, student_id) in assignments {
        by_item.entry(item_id).or_default().push(student_id);
    }

    Ok(items
        .into_iter()
        .map(|item| {
            let student_ids = by_item.remove(&item.id).unwrap_or_default();
            WorkItemResponse::from_db(item, student_ids)
        })
        .collect())
}

#[cfg(test)]
mod tests;
