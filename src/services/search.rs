use anyhow::Result;
use serde::Serialize;

use crate::constants::limits;
use crate::db::{CatalogFilter, CatalogOrder, Store};
use crate::models::AnimeRecord;

/// Parsed search inputs. Absent fields add no predicate.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Case-insensitive substring match on the title; empty matches all.
    pub query: String,
    /// Intersection semantics: an anime must carry every listed tag.
    pub tags: Vec<String>,
    pub studio: Option<String>,
    pub rating: Option<f32>,
    /// 1-based.
    pub page: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub results: Vec<AnimeRecord>,
    pub total: u64,
    pub page: u64,
}

/// Composes the variable-predicate, paginated catalog query.
#[derive(Clone)]
pub struct SearchService {
    store: Store,
}

impl SearchService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// `total` is always the full match count for the predicate; a page past
    /// the end yields an empty window, never an error.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        let page = params.page.max(1);

        let mut filter = CatalogFilter {
            title_contains: Some(params.query.clone()),
            studio_name: params.studio.clone(),
            rating_eq: params.rating,
            ..Default::default()
        };

        if !params.tags.is_empty() {
            // Tag intersection resolved at the data-access boundary: keep the
            // anime whose tag set is a superset of the request.
            let ids = self.store.anime_ids_with_all_tags(&params.tags).await?;
            if ids.is_empty() {
                return Ok(SearchPage {
                    results: Vec::new(),
                    total: 0,
                    page,
                });
            }
            filter.id_in = Some(ids);
        }

        let total = self.store.count_anime(&filter).await?;

        let offset = (page - 1) * limits::SEARCH_PAGE_SIZE;
        let results = self
            .store
            .list_anime(
                &filter,
                CatalogOrder::TitleAsc,
                Some(limits::SEARCH_PAGE_SIZE),
                Some(offset),
            )
            .await?;

        Ok(SearchPage {
            results,
            total,
            page,
        })
    }
}
