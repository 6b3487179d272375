use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStudent, CurrentUser};
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::work_items::WorkItemKind;
use crate::schemas::user::{
    ClassmateResponse, ProfileResponse, ProfileUpdateRequest, UserResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me/profile", get(profile).patch(update_profile))
        .route("/classmates", get(classmates))
}

async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let response = build_profile_response(&state, user).await?;
    Ok(Json(response))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if let Some(username) = &payload.username {
        validation::validate_username(username)?;
        let existing = repositories::users::find_by_username(state.db(), username)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check username"))?;
        if existing.map(|other| other.id != user.id).unwrap_or(false) {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }
    }
    if let Some(email) = &payload.email {
        validation::validate_email(email)?;
    }

    repositories::users::update_profile_fields(
        state.db(),
        &user.id,
        repositories::users::UpdateProfileFields {
            username: payload.username,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            bio: payload.bio,
            skills: payload.skills,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    let user = repositories::users::fetch_one_by_id(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload user"))?;

    let response = build_profile_response(&state, user).await?;
    Ok(Json(response))
}

async fn classmates(
    State(state): State<AppState>,
    CurrentStudent(user, profile): CurrentStudent,
) -> Result<Json<Vec<ClassmateResponse>>, ApiError> {
    let students = repositories::users::list_students_for_option(state.db(), &profile.option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classmates"))?;

    let classmates = students
        .into_iter()
        .filter(|student| student.id != user.id)
        .map(ClassmateResponse::from_db)
        .collect();

    Ok(Json(classmates))
}

/// User payload enriched with option name and mentor expertise.
pub(crate) async fn build_user_response(
    state: &AppState,
    user: User,
) -> Result<UserResponse, ApiError> {
    let (option_id, expertise) = match user.role {
        UserRole::Student => {
            let profile = repositories::profiles::find_student_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?;
            (profile.map(|p| p.option_id), None)
        }
        UserRole::Mentor => {
            let profile = repositories::profiles::find_mentor_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?;
            match profile {
                Some(profile) => (Some(profile.option_id), Some(profile.expertise)),
                None => (None, None),
            }
        }
    };

    let option_name = match option_id {
        Some(option_id) => repositories::options::find_by_id(state.db(), &option_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load option"))?
            .map(|option| option.name),
        None => None,
    };

    Ok(UserResponse::from_db(user, option_name, expertise))
}

async fn build_profile_response(
    state: &AppState,
    user: User,
) -> Result<ProfileResponse, ApiError> {
    let (reports_count, projects_count) = match user.role {
        UserRole::Student => {
            let reports = repositories::reports::count_for_student(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to count reports"))?;
            let projects =
                repositories::work_items::list_for_student(state.db(), WorkItemKind::Project, &user.id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to list projects"))?;
            (reports, projects.len() as i64)
        }
        UserRole::Mentor => {
            let projects =
                repositories::work_items::list_for_mentor(state.db(), WorkItemKind::Project, &user.id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to list projects"))?;
            (0, projects.len() as i64)
        }
    };

    let user = build_user_response(state, user).await?;
    Ok(ProfileResponse { user, reports_count, projects_count })
}

#[cfg(test)]
mod tests;
