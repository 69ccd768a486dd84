use std::collections::HashMap;

use crate::constants::limits;
use crate::db::{AddOutcome, Store};
use crate::models::{WatchStatus, WatchlistRecord};

#[derive(Debug, thiserror::Error)]
pub enum WatchlistError {
    #[error("{0}")]
    InvalidStatus(String),
    #[error("Anime not found")]
    AnimeNotFound,
    #[error("Anime already in watchlist")]
    Duplicate,
    #[error("Watchlist entry not found")]
    EntryNotFound,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

fn parse_status(raw: &str) -> Result<WatchStatus, WatchlistError> {
    raw.parse().map_err(WatchlistError::InvalidStatus)
}

/// Per-user watchlist operations and the joined list views.
#[derive(Clone)]
pub struct WatchlistService {
    store: Store,
}

impl WatchlistService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add(
        &self,
        user_id: i32,
        anime_id: i32,
        status: &str,
    ) -> Result<(), WatchlistError> {
        let status = parse_status(status)?;

        if self.store.get_anime(anime_id).await?.is_none() {
            return Err(WatchlistError::AnimeNotFound);
        }

        match self.store.watchlist_add(user_id, anime_id, status).await? {
            AddOutcome::Inserted => Ok(()),
            AddOutcome::Duplicate => Err(WatchlistError::Duplicate),
        }
    }

    pub async fn update_status(
        &self,
        user_id: i32,
        anime_id: i32,
        status: &str,
    ) -> Result<(), WatchlistError> {
        let status = parse_status(status)?;

        if self
            .store
            .watchlist_update_status(user_id, anime_id, status)
            .await?
        {
            Ok(())
        } else {
            Err(WatchlistError::EntryNotFound)
        }
    }

    pub async fn remove(&self, user_id: i32, anime_id: i32) -> Result<(), WatchlistError> {
        if self.store.watchlist_remove(user_id, anime_id).await? {
            Ok(())
        } else {
            Err(WatchlistError::EntryNotFound)
        }
    }

    /// Plan-to-Watch and Watching entries, most recently updated first.
    pub async fn active(
        &self,
        user_id: i32,
        page: Option<u64>,
    ) -> Result<Vec<WatchlistRecord>, WatchlistError> {
        self.list(user_id, &[WatchStatus::PlanToWatch, WatchStatus::Watching], page)
            .await
    }

    pub async fn completed(
        &self,
        user_id: i32,
        page: Option<u64>,
    ) -> Result<Vec<WatchlistRecord>, WatchlistError> {
        self.list(user_id, &[WatchStatus::Completed], page).await
    }

    async fn list(
        &self,
        user_id: i32,
        statuses: &[WatchStatus],
        page: Option<u64>,
    ) -> Result<Vec<WatchlistRecord>, WatchlistError> {
        let mut entries = self
            .store
            .watchlist_entries_for_user(user_id, statuses)
            .await?;

        // Pagination is opt-in: without ?page the full list comes back.
        if let Some(page) = page {
            let page = page.max(1);
            let size = limits::WATCHLIST_PAGE_SIZE as usize;
            let start = ((page - 1) as usize).saturating_mul(size);
            entries = if start >= entries.len() {
                Vec::new()
            } else {
                entries.into_iter().skip(start).take(size).collect()
            };
        }

        let ids: Vec<i32> = entries.iter().map(|e| e.anime_id).collect();
        let records = self.store.get_anime_by_ids_ordered(&ids).await?;
        let by_id: HashMap<i32, _> = records.into_iter().map(|r| (r.id, r)).collect();

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                by_id.get(&entry.anime_id).map(|anime| WatchlistRecord {
                    anime: anime.clone(),
                    watchlist_status: entry.status,
                    date_added: entry.date_added,
                    last_updated: entry.last_updated,
                })
            })
            .collect())
    }
}
