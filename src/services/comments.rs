use anyhow::anyhow;

use crate::db::Store;
use crate::models::CommentRecord;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Comment text is required")]
    EmptyBody,
    #[error("Comment not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct CommentService {
    store: Store,
}

impl CommentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, anime_id: i32) -> Result<Vec<CommentRecord>, CommentError> {
        Ok(self.store.comments_for_anime(anime_id).await?)
    }

    /// Persists a trimmed comment and returns it joined with the author.
    pub async fn post(
        &self,
        anime_id: i32,
        user_id: i32,
        body: &str,
    ) -> Result<CommentRecord, CommentError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CommentError::EmptyBody);
        }

        let id = self.store.insert_comment(anime_id, user_id, body).await?;

        self.store
            .get_comment(id)
            .await?
            .ok_or_else(|| CommentError::Database(anyhow!("inserted comment {id} missing")))
    }

    pub async fn delete(&self, comment_id: i32) -> Result<(), CommentError> {
        if self.store.delete_comment(comment_id).await? {
            Ok(())
        } else {
            Err(CommentError::NotFound)
        }
    }
}
