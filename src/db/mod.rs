use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::{GeneralConfig, SecurityConfig};
use crate::entities::watchlist;
use crate::models::{AnimeRecord, CommentRecord, User, WatchStatus};

pub mod migrator;
pub mod repositories;

pub use repositories::anime::{CatalogFilter, CatalogOrder};
pub use repositories::user::{NewUser, RegisterConflict};
pub use repositories::watchlist::AddOutcome;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Connects with bounded retry. A lost database at startup is retried
    /// `general.db_connect_attempts` times with a fixed delay before the
    /// process gives up.
    pub async fn connect(general: &GeneralConfig) -> Result<Self> {
        let mut attempt = 1;
        loop {
            match Self::with_pool_options(
                &general.database_path,
                general.max_db_connections,
                general.min_db_connections,
            )
            .await
            {
                Ok(store) => return Ok(store),
                Err(err) if attempt < general.db_connect_attempts => {
                    warn!(
                        "Database connection attempt {}/{} failed: {}; retrying in {}s",
                        attempt, general.db_connect_attempts, err, general.db_reconnect_delay_seconds
                    );
                    tokio::time::sleep(Duration::from_secs(general.db_reconnect_delay_seconds))
                        .await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Each pooled :memory: connection is a separate database; keep one.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn watchlist_repo(&self) -> repositories::watchlist::WatchlistRepository {
        repositories::watchlist::WatchlistRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Catalog ==========

    pub async fn list_anime(
        &self,
        filter: &CatalogFilter,
        order: CatalogOrder,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<AnimeRecord>> {
        self.anime_repo().list(filter, order, limit, offset).await
    }

    pub async fn count_anime(&self, filter: &CatalogFilter) -> Result<u64> {
        self.anime_repo().count(filter).await
    }

    pub async fn get_anime(&self, id: i32) -> Result<Option<AnimeRecord>> {
        self.anime_repo().get(id).await
    }

    pub async fn get_anime_by_ids_ordered(&self, ids: &[i32]) -> Result<Vec<AnimeRecord>> {
        self.anime_repo().list_by_ids_ordered(ids).await
    }

    pub async fn random_anime_ids(&self, limit: u64) -> Result<Vec<i32>> {
        self.anime_repo().random_ids(limit).await
    }

    pub async fn most_watchlisted_ids(&self, limit: Option<u64>) -> Result<Vec<(i32, i64)>> {
        self.anime_repo().most_watchlisted_ids(limit).await
    }

    // ========== Tags ==========

    pub async fn all_tag_names(&self) -> Result<Vec<String>> {
        self.tag_repo().all_names().await
    }

    pub async fn anime_ids_with_all_tags(&self, names: &[String]) -> Result<Vec<i32>> {
        self.tag_repo().anime_ids_with_all_tags(names).await
    }

    pub async fn anime_ids_with_any_tag(&self, names: &[String]) -> Result<Vec<i32>> {
        self.tag_repo().anime_ids_with_any_tag(names).await
    }

    pub async fn user_tag_frequencies(&self, user_id: i32) -> Result<Vec<(String, i64)>> {
        self.tag_repo().user_tag_frequencies(user_id).await
    }

    // ========== Watchlist ==========

    pub async fn watchlist_count_for_user(&self, user_id: i32) -> Result<u64> {
        self.watchlist_repo().count_for_user(user_id).await
    }

    pub async fn watchlist_anime_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>> {
        self.watchlist_repo().anime_ids_for_user(user_id).await
    }

    pub async fn watchlist_popularity_counts(&self) -> Result<HashMap<i32, i64>> {
        self.watchlist_repo().popularity_counts().await
    }

    pub async fn watchlist_entries_for_user(
        &self,
        user_id: i32,
        statuses: &[WatchStatus],
    ) -> Result<Vec<watchlist::Model>> {
        self.watchlist_repo()
            .entries_for_user(user_id, statuses)
            .await
    }

    pub async fn watchlist_add(
        &self,
        user_id: i32,
        anime_id: i32,
        status: WatchStatus,
    ) -> Result<AddOutcome> {
        self.watchlist_repo().add(user_id, anime_id, status).await
    }

    pub async fn watchlist_update_status(
        &self,
        user_id: i32,
        anime_id: i32,
        status: WatchStatus,
    ) -> Result<bool> {
        self.watchlist_repo()
            .update_status(user_id, anime_id, status)
            .await
    }

    pub async fn watchlist_remove(&self, user_id: i32, anime_id: i32) -> Result<bool> {
        self.watchlist_repo().remove(user_id, anime_id).await
    }

    // ========== Comments ==========

    pub async fn comments_for_anime(&self, anime_id: i32) -> Result<Vec<CommentRecord>> {
        self.comment_repo().list_for_anime(anime_id).await
    }

    pub async fn get_comment(&self, comment_id: i32) -> Result<Option<CommentRecord>> {
        self.comment_repo().get(comment_id).await
    }

    pub async fn insert_comment(&self, anime_id: i32, user_id: i32, body: &str) -> Result<i32> {
        self.comment_repo().insert(anime_id, user_id, body).await
    }

    pub async fn delete_comment(&self, comment_id: i32) -> Result<bool> {
        self.comment_repo().delete(comment_id).await
    }

    // ========== Users ==========

    pub async fn find_registration_conflict(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
    ) -> Result<Option<RegisterConflict>> {
        self.user_repo()
            .find_conflict(username, email, display_name)
            .await
    }

    pub async fn create_user(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn stamp_login(&self, user_id: i32) -> Result<()> {
        self.user_repo().stamp_login(user_id).await
    }
}
