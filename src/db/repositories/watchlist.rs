use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{prelude::*, watchlist};
use crate::models::WatchStatus;

/// Outcome of the conditional insert behind Add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// The (user, anime) pair already existed; the unique index rejected the
    /// insert without a prior read.
    Duplicate,
}

pub struct WatchlistRepository {
    conn: DatabaseConnection,
}

impl WatchlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count_for_user(&self, user_id: i32) -> anyhow::Result<u64> {
        let count = Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn anime_ids_for_user(&self, user_id: i32) -> anyhow::Result<Vec<i32>> {
        let ids: Vec<i32> = Watchlist::find()
            .select_only()
            .column(watchlist::Column::AnimeId)
            .filter(watchlist::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids)
    }

    /// Watchlist membership counts across all users, keyed by anime id.
    pub async fn popularity_counts(&self) -> anyhow::Result<HashMap<i32, i64>> {
        let rows: Vec<(i32, i64)> = Watchlist::find()
            .select_only()
            .column(watchlist::Column::AnimeId)
            .column_as(watchlist::Column::Id.count(), "cnt")
            .group_by(watchlist::Column::AnimeId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Entries for `user_id` restricted to `statuses`, most recently updated
    /// first.
    pub async fn entries_for_user(
        &self,
        user_id: i32,
        statuses: &[WatchStatus],
    ) -> anyhow::Result<Vec<watchlist::Model>> {
        let status_names: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let rows = Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .filter(watchlist::Column::Status.is_in(status_names))
            .order_by_desc(watchlist::Column::LastUpdated)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Single conditional insert; the unique (user, anime) index turns a
    /// concurrent double-add into a `Duplicate` outcome instead of a second
    /// row.
    pub async fn add(
        &self,
        user_id: i32,
        anime_id: i32,
        status: WatchStatus,
    ) -> anyhow::Result<AddOutcome> {
        let now = chrono::Utc::now().to_rfc3339();

        let entry = watchlist::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            status: Set(status.as_str().to_string()),
            date_added: Set(now.clone()),
            last_updated: Set(now),
            ..Default::default()
        };

        let result = Watchlist::insert(entry)
            .on_conflict(
                OnConflict::columns([watchlist::Column::UserId, watchlist::Column::AnimeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match result {
            Ok(_) => {
                info!("Watchlist add: user {} anime {}", user_id, anime_id);
                Ok(AddOutcome::Inserted)
            }
            Err(DbErr::RecordNotInserted) => Ok(AddOutcome::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns false when the (user, anime) pair has no row. A same-status
    /// update still refreshes `last_updated`.
    pub async fn update_status(
        &self,
        user_id: i32,
        anime_id: i32,
        status: WatchStatus,
    ) -> anyhow::Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = Watchlist::update_many()
            .col_expr(
                watchlist::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            )
            .col_expr(
                watchlist::Column::LastUpdated,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(watchlist::Column::UserId.eq(user_id))
            .filter(watchlist::Column::AnimeId.eq(anime_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, user_id: i32, anime_id: i32) -> anyhow::Result<bool> {
        let result = Watchlist::delete_many()
            .filter(watchlist::Column::UserId.eq(user_id))
            .filter(watchlist::Column::AnimeId.eq(anime_id))
            .exec(&self.conn)
            .await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Watchlist remove: user {} anime {}", user_id, anime_id);
        }
        Ok(removed)
    }
}
