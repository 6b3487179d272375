use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{MentorProfile, StudentProfile, User};
use crate::db::types::UserRole;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);

/// Student-only routes: the user plus their student profile.
pub(crate) struct CurrentStudent(pub(crate) User, pub(crate) StudentProfile);

/// Mentor-only routes: the user plus their mentor profile (carries the option
/// the mentor is scoped to).
pub(crate) struct CurrentMentor(pub(crate) User, pub(crate) MentorProfile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let denied = app_state
            .redis()
            .is_token_denied(&security::token_fingerprint(token))
            .await
            .unwrap_or(false);
        if denied {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Student {
            return Err(ApiError::Forbidden("Student access required"));
        }

        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let profile = repositories::profiles::find_student_for_user(app_state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load student profile"))?
            .ok_or(ApiError::Forbidden("Student profile missing"))?;

        Ok(CurrentStudent(user, profile))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentMentor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Mentor {
            return Err(ApiError::Forbidden("Mentor access required"));
        }

        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let profile = repositories::profiles::find_mentor_for_user(app_state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load mentor profile"))?
            .ok_or(ApiError::Forbidden("Mentor profile missing"))?;

        Ok(CurrentMentor(user, profile))
    }
}
