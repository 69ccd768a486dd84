use anyhow::Result;

use crate::constants::{limits, ratings};
use crate::db::{CatalogFilter, CatalogOrder, Store};
use crate::models::AnimeRecord;

/// Read-only accessor for the fixed homepage shelves and the detail page.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn focus(&self, anime_id: i32) -> Result<Option<AnimeRecord>> {
        self.store.get_anime(anime_id).await
    }

    /// Homepage spotlight carousel: the handful of top-of-scale titles.
    pub async fn spotlight(&self) -> Result<Vec<AnimeRecord>> {
        let filter = CatalogFilter {
            min_rating: Some(ratings::HOMEPAGE_SPOTLIGHT_FLOOR),
            ..Default::default()
        };
        self.store
            .list_anime(
                &filter,
                CatalogOrder::TitleAsc,
                Some(limits::SPOTLIGHT_LIMIT),
                None,
            )
            .await
    }

    pub async fn new_animes(&self) -> Result<Vec<AnimeRecord>> {
        let filter = CatalogFilter {
            status_eq: Some("Airing".to_string()),
            ..Default::default()
        };
        self.store
            .list_anime(&filter, CatalogOrder::AiringStartDesc, None, None)
            .await
    }

    pub async fn upcoming(&self) -> Result<Vec<AnimeRecord>> {
        let filter = CatalogFilter {
            status_eq: Some("Upcoming".to_string()),
            ..Default::default()
        };
        self.store
            .list_anime(&filter, CatalogOrder::AiringStartDesc, None, None)
            .await
    }

    pub async fn recommended(&self) -> Result<Vec<AnimeRecord>> {
        let filter = CatalogFilter {
            min_rating: Some(ratings::RECOMMENDED_FLOOR),
            ..Default::default()
        };
        self.store
            .list_anime(
                &filter,
                CatalogOrder::RatingDesc,
                Some(limits::RECOMMENDED_LIMIT),
                None,
            )
            .await
    }

    pub async fn random(&self) -> Result<Vec<AnimeRecord>> {
        let ids = self.store.random_anime_ids(limits::RANDOM_LIMIT).await?;
        self.store.get_anime_by_ids_ordered(&ids).await
    }

    pub async fn all(&self) -> Result<Vec<AnimeRecord>> {
        self.store
            .list_anime(&CatalogFilter::default(), CatalogOrder::TitleAsc, None, None)
            .await
    }

    pub async fn all_tags(&self) -> Result<Vec<String>> {
        self.store.all_tag_names().await
    }

    /// Anime ranked by how many watchlists they appear in.
    pub async fn most_watchlisted(&self) -> Result<Vec<AnimeRecord>> {
        let ranked = self
            .store
            .most_watchlisted_ids(Some(limits::MOST_WATCHLISTED_LIMIT))
            .await?;

        let ids: Vec<i32> = ranked.iter().map(|(id, _)| *id).collect();
        let mut records = self.store.get_anime_by_ids_ordered(&ids).await?;

        for record in &mut records {
            if let Some((_, count)) = ranked.iter().find(|(id, _)| *id == record.id) {
                record.watchlist_count = Some(*count);
            }
        }

        Ok(records)
    }
}
