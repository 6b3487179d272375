use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::users::build_user_response;
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::{security, time::primitive_now_utc};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::{LogoutResponse, TokenResponse};
use crate::schemas::user::{LoginRequest, MentorSignupRequest, SignupRequest, UserResponse};

/// Max attempts per window for auth endpoints.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/mentor-signup", post(mentor_signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let (user, option_name) = register(&state, &payload, UserRole::Student, "").await?;

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    let response = TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user, Some(option_name), None),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn mentor_signup(
    State(state): State<AppState>,
    Json(payload): Json<MentorSignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let (user, option_name) =
        register(&state, &payload.base, UserRole::Mentor, &payload.expertise).await?;

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    let response = TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user, Some(option_name), Some(payload.expertise)),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let rate_key = format!("rl:login:{}", payload.username);
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let user = repositories::users::find_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Incorrect username or password"))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    let user = build_user_response(&state, user).await?;

    Ok(Json(TokenResponse { access_token: token, token_type: "bearer".to_string(), user }))
}

/// Denylists the presented token until its natural expiry. The token is
/// already verified by the guard; here it only needs to be re-read to be
/// fingerprinted.
async fn logout(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

    let claims = security::verify_token(token, state.settings())
        .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

    let ttl = (claims.exp - OffsetDateTime::now_utc().unix_timestamp()).max(1) as u64;
    state
        .redis()
        .deny_token(&security::token_fingerprint(token), ttl)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to revoke token"))?;

    Ok(Json(LogoutResponse { detail: "Successfully logged out" }))
}

async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let response = build_user_response(&state, user).await?;
    Ok(Json(response))
}

/// Shared signup path: validates input, resolves the option, and creates the
/// user with its role profile in one transaction.
async fn register(
    state: &AppState,
    payload: &SignupRequest,
    role: UserRole,
    expertise: &str,
) -> Result<(User, String), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_email(&payload.email)?;
    validation::validate_password_len(&payload.password)?;

    let rate_key = format!("rl:signup:{}", payload.username);
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many signup attempts, try again later"));
    }

    let existing =
        repositories::users::exists_by_username_or_email(state.db(), &payload.username, &payload.email)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict(
            "User with this username or email already exists".to_string(),
        ));
    }

    let option = repositories::options::find_by_name(state.db(), &payload.option)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load option"))?
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown option: {}", payload.option)))?;

    if role == UserRole::Mentor {
        let taken = repositories::profiles::find_mentor_for_option(state.db(), &option.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check option mentor"))?;
        if taken.is_some() {
            return Err(ApiError::Conflict("This option already has a mentor".to_string()));
        }
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create_with_profile(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            username: &payload.username,
            email: &payload.email,
            hashed_password,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            phone: &payload.phone,
            role,
            option_id: &option.id,
            expertise,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    Ok((user, option.name))
}
