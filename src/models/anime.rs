use serde::{Deserialize, Serialize};

/// Denormalized catalog row: the anime joined with its studio plus a single
/// comma-joined, alphabetically sorted string of distinct tag names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub id: i32,
    pub title: String,
    /// "TV", "Movie", "OVA", ... Serialized as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: String,
    pub episodes: Option<i32>,
    pub status: String,
    pub airing_start: Option<String>,
    pub airing_end: Option<String>,
    pub rating: f32,
    pub synopsis: Option<String>,
    pub image_url: Option<String>,
    pub studio_name: String,
    pub studio_rating: Option<f32>,
    /// e.g. "Action, Adventure, Isekai"
    pub genres: String,
    /// How many watchlists this anime appears in. Only populated by the
    /// popularity-ordered queries.
    pub watchlist_count: Option<i64>,
}
