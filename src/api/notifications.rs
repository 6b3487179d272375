use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::notification::NotificationResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_notifications))
}

/// Listing doubles as acknowledgement: everything returned is marked read.
async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = repositories::notifications::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list notifications"))?;

    repositories::notifications::mark_all_read(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark notifications read"))?;

    Ok(Json(notifications.into_iter().map(NotificationResponse::from_db).collect()))
}
