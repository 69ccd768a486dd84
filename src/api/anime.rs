use axum::{Json, extract::Path, extract::State};

use super::ApiError;
use crate::models::AnimeRecord;
use crate::state::AppState;

/// GET /focusanime/{animeId}
pub async fn focus(
    State(state): State<AppState>,
    Path(anime_id): Path<i32>,
) -> Result<Json<AnimeRecord>, ApiError> {
    state
        .catalog
        .focus(anime_id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::anime_not_found)
}

/// GET /anime/animespotlight-animes
pub async fn spotlight(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.spotlight().await?))
}

/// GET /anime/new-animes
pub async fn new_animes(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.new_animes().await?))
}

/// GET /anime/upcoming-animes
pub async fn upcoming(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.upcoming().await?))
}

/// GET /anime/recommended-animes
pub async fn recommended(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.recommended().await?))
}

/// GET /anime/random-animes
pub async fn random(State(state): State<AppState>) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.random().await?))
}

/// GET /anime/all-animes
pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.all().await?))
}

/// GET /anime/all-tags
pub async fn all_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog.all_tags().await?))
}

/// GET /anime/mostwatchlist-animes
pub async fn most_watchlisted(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimeRecord>>, ApiError> {
    Ok(Json(state.catalog.most_watchlisted().await?))
}
