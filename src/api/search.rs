use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;

use super::ApiError;
use crate::services::{SearchPage, SearchParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Comma-separated tag names; every listed tag must match.
    pub tags: Option<String>,
    pub studio: Option<String>,
    pub rating: Option<f32>,
    pub page: Option<u64>,
}

impl From<SearchQuery> for SearchParams {
    fn from(query: SearchQuery) -> Self {
        let tags = query
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect();

        Self {
            query: query.q.trim().to_string(),
            tags,
            studio: query.studio.filter(|s| !s.trim().is_empty()),
            rating: query.rating,
            page: query.page.unwrap_or(1),
        }
    }
}

/// GET /search?q=&tags=&studio=&rating=&page=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchPage>, ApiError> {
    let params = SearchParams::from(query);
    Ok(Json(state.search.search(&params).await?))
}
