use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentMentor, CurrentStudent, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Course, CourseProgress};
use crate::db::types::UserRole;
use crate::repositories;
use crate::repositories::progress::ReactError;
use crate::schemas::course::{
    CourseCreate, CourseListResponse, CourseResponse, CourseWithProgress, ReactRequest,
    ReactResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id/complete", post(complete_course))
        .route("/:id/react", post(react_to_course))
}

async fn list_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CourseListResponse>, ApiError> {
    let option_id = match user.role {
        UserRole::Student => {
            repositories::profiles::find_student_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?
                .ok_or(ApiError::Forbidden("Student profile missing"))?
                .option_id
        }
        UserRole::Mentor => {
            repositories::profiles::find_mentor_for_user(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?
                .ok_or(ApiError::Forbidden("Mentor profile missing"))?
                .option_id
        }
    };

    let courses = repositories::courses::list_for_option(state.db(), &option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let progress = match user.role {
        UserRole::Student => repositories::progress::list_for_student(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load progress"))?,
        UserRole::Mentor => Vec::new(),
    };

    Ok(Json(build_course_list(courses, progress)))
}

async fn create_course(
    State(state): State<AppState>,
    CurrentMentor(_user, profile): CurrentMentor,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }

    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title: &payload.title,
            order_index: payload.order_index,
            option_id: &profile.option_id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn complete_course(
    State(state): State<AppState>,
    CurrentStudent(user, profile): CurrentStudent,
    Path(id): Path<String>,
) -> Result<Json<CourseWithProgress>, ApiError> {
    let course = load_course_for_student(&state, &id, &profile.option_id).await?;

    let progress =
        repositories::progress::mark_completed(state.db(), &user.id, &course.id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to record completion"))?;

    Ok(Json(CourseWithProgress::from_db(course, Some(&progress))))
}

async fn react_to_course(
    State(state): State<AppState>,
    CurrentStudent(user, profile): CurrentStudent,
    Path(id): Path<String>,
    Json(payload): Json<ReactRequest>,
) -> Result<(StatusCode, Json<ReactResponse>), ApiError> {
    let course = load_course_for_student(&state, &id, &profile.option_id).await?;

    match repositories::progress::react(
        state.db(),
        &user.id,
        &course.id,
        payload.emoji,
        primitive_now_utc(),
    )
    .await
    {
        Ok(_) => Ok((StatusCode::OK, Json(ReactResponse::ok()))),
        Err(ReactError::AlreadyReacted) => Ok((
            StatusCode::CONFLICT,
            Json(ReactResponse::error("You have already reacted to this course")),
        )),
        Err(ReactError::Db(err)) => Err(ApiError::internal(err, "Failed to record reaction")),
    }
}

fn build_course_list(courses: Vec<Course>, progress: Vec<CourseProgress>) -> CourseListResponse {
    let by_course: HashMap<String, CourseProgress> =
        progress.into_iter().map(|p| (p.course_id.clone(), p)).collect();

    let next_course_id = courses
        .iter()
        .find(|course| !by_course.get(&course.id).map(|p| p.completed).unwrap_or(false))
        .map(|course| course.id.clone());

    let courses = courses
        .into_iter()
        .map(|course| {
            let progress = by_course.get(&course.id);
            CourseWithProgress::from_db(course, progress)
        })
        .collect();

    CourseListResponse { courses, next_course_id }
}

async fn load_course_for_student(
    state: &AppState,
    id: &str,
    option_id: &str,
) -> Result<Course, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if course.option_id != option_id {
        return Err(ApiError::Forbidden("This course belongs to another option"));
    }

    Ok(course)
}

#[cfg(test)]
mod tests;
