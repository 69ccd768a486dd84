use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use super::{ApiError, auth};
use crate::models::CommentRecord;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PostRequest {
    pub body: String,
}

/// GET /anime/{animeId}/comments
pub async fn list(
    State(state): State<AppState>,
    Path(anime_id): Path<i32>,
) -> Result<Json<Vec<CommentRecord>>, ApiError> {
    Ok(Json(state.comments.list(anime_id).await?))
}

/// POST /anime/{animeId}/comments
pub async fn post(
    State(state): State<AppState>,
    session: Session,
    Path(anime_id): Path<i32>,
    Json(payload): Json<PostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&session).await?;

    if state.catalog.focus(anime_id).await?.is_none() {
        return Err(ApiError::anime_not_found());
    }

    let comment = state.comments.post(anime_id, user.id, &payload.body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /comments/{commentId} — admin only.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(comment_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&session).await?;
    if !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Admin privileges required".to_string(),
        ));
    }

    state.comments.delete(comment_id).await?;
    Ok(Json(json!({ "message": "Comment deleted" })))
}
