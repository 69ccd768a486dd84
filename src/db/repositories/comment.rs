use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{comments, prelude::*, users};
use crate::models::CommentRecord;

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Comments for an anime, oldest first, joined with the author.
    pub async fn list_for_anime(&self, anime_id: i32) -> anyhow::Result<Vec<CommentRecord>> {
        let rows = Comments::find()
            .filter(comments::Column::AnimeId.eq(anime_id))
            .order_by_asc(comments::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentRecord {
                id: comment.id,
                anime_id: comment.anime_id,
                user_id: comment.user_id,
                body: comment.body,
                created_at: comment.created_at,
                display_name: author
                    .as_ref()
                    .map(|u| u.display_name.clone())
                    .unwrap_or_default(),
                role: author.map(|u| u.role).unwrap_or_default(),
            })
            .collect())
    }

    /// Single comment joined with its author, or None.
    pub async fn get(&self, comment_id: i32) -> anyhow::Result<Option<CommentRecord>> {
        let row = Comments::find_by_id(comment_id)
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await?;

        Ok(row.map(|(comment, author)| CommentRecord {
            id: comment.id,
            anime_id: comment.anime_id,
            user_id: comment.user_id,
            body: comment.body,
            created_at: comment.created_at,
            display_name: author
                .as_ref()
                .map(|u| u.display_name.clone())
                .unwrap_or_default(),
            role: author.map(|u| u.role).unwrap_or_default(),
        }))
    }

    pub async fn insert(&self, anime_id: i32, user_id: i32, body: &str) -> anyhow::Result<i32> {
        let comment = comments::ActiveModel {
            anime_id: Set(anime_id),
            user_id: Set(user_id),
            body: Set(body.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = Comments::insert(comment).exec(&self.conn).await?;
        Ok(result.last_insert_id)
    }

    /// Returns false when no comment matched the id.
    pub async fn delete(&self, comment_id: i32) -> anyhow::Result<bool> {
        let result = Comments::delete_by_id(comment_id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
