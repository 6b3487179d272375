use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentMentor, CurrentStudent, CurrentUser};
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::Report;
use crate::db::types::{ReportStatus, UserRole};
use crate::repositories;
use crate::schemas::report::{
    summarize, MarkRequest, ReportCreate, ReportResponse, ReportUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/sample", get(sample_report))
        .route("/:id", get(get_report).patch(update_report).delete(delete_report))
        .route("/:id/mark", post(mark_report))
}

async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let reports = match user.role {
        UserRole::Student => repositories::reports::list_for_student(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list reports"))?,
        UserRole::Mentor => {
            let profile = repositories::profiles::find_mentor_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?
                .ok_or(ApiError::Forbidden("Mentor profile missing"))?;
            repositories::reports::list_for_option(state.db(), &profile.option_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list reports"))?
        }
    };

    Ok(Json(reports.into_iter().map(ReportResponse::from_db).collect()))
}

async fn create_report(
    State(state): State<AppState>,
    CurrentStudent(user, profile): CurrentStudent,
    Json(payload): Json<ReportCreate>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }
    validation::validate_hours_worked(payload.hours_worked)?;

    let report = repositories::reports::create(
        state.db(),
        repositories::reports::CreateReport {
            id: &Uuid::new_v4().to_string(),
            title: &payload.title,
            tags: &payload.tags,
            hours_worked: payload.hours_worked,
            status: payload.status,
            content: &payload.content,
            student_id: &user.id,
            // Option is forced to the student's own option, never client-supplied.
            option_id: &profile.option_id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create report"))?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from_db(report))))
}

async fn get_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = load_report(&state, &id).await?;

    if report.student_id != user.id && !is_mentor_of_option(&state, &user.id, &report).await? {
        return Err(ApiError::Forbidden("You do not have access to this report"));
    }

    Ok(Json(ReportResponse::from_db(report)))
}

async fn update_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReportUpdate>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = load_report(&state, &id).await?;

    if report.student_id != user.id {
        return Err(ApiError::Forbidden("Only the author can edit a report"));
    }

    if let Some(hours) = payload.hours_worked {
        validation::validate_hours_worked(hours)?;
    }

    repositories::reports::update(
        state.db(),
        &report.id,
        repositories::reports::UpdateReport {
            title: payload.title,
            tags: payload.tags,
            hours_worked: payload.hours_worked,
            status: payload.status,
            content: payload.content,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update report"))?;

    let report = repositories::reports::fetch_one_by_id(state.db(), &report.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload report"))?;

    Ok(Json(ReportResponse::from_db(report)))
}

async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let report = load_report(&state, &id).await?;

    if report.student_id != user.id {
        return Err(ApiError::Forbidden("Only the author can delete a report"));
    }

    let deleted = repositories::reports::delete(state.db(), &report.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete report"))?;

    if !deleted {
        return Err(ApiError::NotFound("Report not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Mentor review. Sets the mark, flips the status to reviewed, and notifies
/// the author.
async fn mark_report(
    State(state): State<AppState>,
    CurrentMentor(_user, profile): CurrentMentor,
    Path(id): Path<String>,
    Json(payload): Json<MarkRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = load_report(&state, &id).await?;

    if report.option_id != profile.option_id {
        return Err(ApiError::Forbidden("You can only mark reports in your own option"));
    }

    let max_mark = state.settings().tracking().max_report_mark;
    if payload.mark < 0 || payload.mark > max_mark {
        return Err(ApiError::BadRequest(format!("Mark must be between 0 and {max_mark}")));
    }

    repositories::reports::set_mark(state.db(), &report.id, payload.mark, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark report"))?;

    let message = format!("Your report '{}' received mark {}/{max_mark}", report.title, payload.mark);
    repositories::notifications::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        &report.student_id,
        &message,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create notification"))?;

    let report = repositories::reports::fetch_one_by_id(state.db(), &report.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload report"))?;

    Ok(Json(ReportResponse::from_db(report)))
}

/// Public example payload showing the report shape.
async fn sample_report() -> Json<ReportResponse> {
    let content = "Implemented the login form, wired it to the API and added \
                   validation errors for empty fields.";
    let now = primitive_now_utc();

    Json(ReportResponse {
        id: "sample".to_string(),
        title: "Day 1: Login form".to_string(),
        tags: "frontend, auth".to_string(),
        hours_worked: 6.5,
        status: ReportStatus::Submitted,
        mark: None,
        content: content.to_string(),
        summary: summarize(content),
        student_id: "sample-student".to_string(),
        option_id: "sample-option".to_string(),
        created_at: format_primitive(now),
        updated_at: format_primitive(now),
    })
}

async fn load_report(state: &AppState, id: &str) -> Result<Report, ApiError> {
    repositories::reports::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load report"))?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))
}

async fn is_mentor_of_option(
    state: &AppState,
    user_id: &str,
    report: &Report,
) -> Result<bool, ApiError> {
    let profile = repositories::profiles::find_mentor_for_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?;
    Ok(profile.map(|p| p.option_id == report.option_id).unwrap_or(false))
}

#[cfg(test)]
mod tests;
