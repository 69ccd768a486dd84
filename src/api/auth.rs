use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use super::ApiError;
use crate::db::{NewUser, RegisterConflict};
use crate::models::SessionUser;
use crate::state::AppState;

const SESSION_USER_KEY: &str = "user";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Guards the `/api/user` subtree. Handlers behind it re-read the session
/// identity via [`current_user`].
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if matches!(session.get::<SessionUser>(SESSION_USER_KEY).await, Ok(Some(_))) {
        return Ok(next.run(request).await);
    }
    Err(ApiError::unauthorized())
}

/// Session identity, or 401 when the caller is not logged in.
pub async fn current_user(session: &Session) -> Result<SessionUser, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(ApiError::unauthorized)
}

fn validate_registration(payload: &RegisterRequest, min_password_length: usize) -> Result<(), ApiError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.display_name.trim().is_empty()
    {
        return Err(ApiError::validation("All fields are required"));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::validation("Invalid email address"));
    }
    if payload.password.len() < min_password_length {
        return Err(ApiError::validation(format!(
            "Password must be at least {min_password_length} characters"
        )));
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::validation("Passwords do not match"));
    }
    Ok(())
}

const fn conflict_message(conflict: RegisterConflict) -> &'static str {
    match conflict {
        RegisterConflict::Username => "Username already taken",
        RegisterConflict::Email => "Email already registered",
        RegisterConflict::DisplayName => "Display name already taken",
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&payload, state.config.security.min_password_length)?;

    if let Some(conflict) = state
        .store
        .find_registration_conflict(&payload.username, &payload.email, &payload.display_name)
        .await?
    {
        return Err(ApiError::Conflict(conflict_message(conflict).to_string()));
    }

    let user = state
        .store
        .create_user(
            NewUser {
                username: payload.username,
                email: payload.email,
                display_name: payload.display_name,
                password: payload.password,
            },
            &state.config.security,
        )
        .await?;

    state.store.stamp_login(user.id).await?;

    let identity = SessionUser::from(&user);
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("New account registered: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created", "displayName": identity.display_name })),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let Some(user) = state
        .store
        .verify_credentials(&payload.username, &payload.password)
        .await?
    else {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    state.store.stamp_login(user.id).await?;

    // Fresh session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let identity = SessionUser::from(&user);
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(json!({
        "message": "Logged in",
        "displayName": identity.display_name,
        "role": identity.role,
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<impl IntoResponse, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    Ok(Json(json!({ "message": "Logged out" })))
}
