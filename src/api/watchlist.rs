use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use super::{ApiError, auth};
use crate::models::{AnimeRecord, WatchlistRecord};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub anime_id: i32,
    pub status: String,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// GET /api/user/spotlight
pub async fn spotlight(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    let user = auth::current_user(&session).await?;
    Ok(Json(state.spotlight.recommendations_for(user.id).await?))
}

/// GET /api/user/watchlist?page=
pub async fn active(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<WatchlistRecord>>, ApiError> {
    let user = auth::current_user(&session).await?;
    Ok(Json(state.watchlist.active(user.id, query.page).await?))
}

/// GET /api/user/watchlist/completed?page=
pub async fn completed(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<WatchlistRecord>>, ApiError> {
    let user = auth::current_user(&session).await?;
    Ok(Json(state.watchlist.completed(user.id, query.page).await?))
}

/// POST /api/user/watchlist
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&session).await?;
    state
        .watchlist
        .add(user.id, payload.anime_id, &payload.status)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Anime added to watchlist" })),
    ))
}

/// PUT /api/user/watchlist/{animeId}
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(anime_id): Path<i32>,
    Json(payload): Json<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&session).await?;
    state
        .watchlist
        .update_status(user.id, anime_id, &payload.status)
        .await?;

    Ok(Json(json!({ "message": "Watchlist entry updated" })))
}

/// DELETE /api/user/watchlist/{animeId}
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(anime_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth::current_user(&session).await?;
    state.watchlist.remove(user.id, anime_id).await?;

    Ok(Json(json!({ "message": "Anime removed from watchlist" })))
}
