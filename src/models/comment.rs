use serde::Serialize;

/// A comment joined with its author's display name and role.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord {
    pub id: i32,
    pub anime_id: i32,
    pub user_id: i32,
    pub body: String,
    pub created_at: String,
    pub display_name: String,
    pub role: String,
}
