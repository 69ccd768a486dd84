use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use crate::constants::ratings;
use crate::db::{CatalogFilter, CatalogOrder, Store};
use crate::models::AnimeRecord;

#[derive(Debug, thiserror::Error)]
pub enum SpotlightError {
    /// The user has history but none of it carries tags, so there is nothing
    /// to personalize on.
    #[error("No tag data found for user.")]
    NoPreferenceSignal,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// One stage of the recommendation cascade. A step either produces a
/// non-empty shortlist or defers to the next step.
#[async_trait]
trait CandidateStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn candidates(
        &self,
        store: &Store,
        user_id: i32,
    ) -> anyhow::Result<Vec<AnimeRecord>>;
}

/// Well-rated titles tagged with something the user has shown interest in,
/// excluding anything already on their watchlist. Ranked by rating, with
/// overall popularity as the tie-break. The full candidate set is returned;
/// only the homepage shelf caps its output.
struct TagAffinityStep {
    preferred: Vec<String>,
}

#[async_trait]
impl CandidateStep for TagAffinityStep {
    fn name(&self) -> &'static str {
        "tag-affinity"
    }

    async fn candidates(
        &self,
        store: &Store,
        user_id: i32,
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        let tagged = store.anime_ids_with_any_tag(&self.preferred).await?;
        if tagged.is_empty() {
            return Ok(Vec::new());
        }

        let owned: HashSet<i32> = store
            .watchlist_anime_ids_for_user(user_id)
            .await?
            .into_iter()
            .collect();

        let unseen: Vec<i32> = tagged.into_iter().filter(|id| !owned.contains(id)).collect();
        if unseen.is_empty() {
            return Ok(Vec::new());
        }

        let filter = CatalogFilter {
            id_in: Some(unseen),
            min_rating: Some(ratings::SPOTLIGHT_FLOOR),
            ..Default::default()
        };
        let mut records = store
            .list_anime(&filter, CatalogOrder::RatingDesc, None, None)
            .await?;

        let popularity: HashMap<i32, i64> = store.watchlist_popularity_counts().await?;
        records.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| {
                    let pa = popularity.get(&a.id).copied().unwrap_or(0);
                    let pb = popularity.get(&b.id).copied().unwrap_or(0);
                    pb.cmp(&pa)
                })
        });

        Ok(records)
    }
}

/// Site-wide fallback: the most-watchlisted titles that still clear the
/// rating floor. Also serves users with no history at all.
struct PopularTopRatedStep;

#[async_trait]
impl CandidateStep for PopularTopRatedStep {
    fn name(&self) -> &'static str {
        "popular-top-rated"
    }

    async fn candidates(
        &self,
        store: &Store,
        _user_id: i32,
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        let ranked = store.most_watchlisted_ids(None).await?;
        let ids: Vec<i32> = ranked.iter().map(|(id, _)| *id).collect();

        let mut records = store.get_anime_by_ids_ordered(&ids).await?;
        records.retain(|r| r.rating >= ratings::SPOTLIGHT_FLOOR);

        for record in &mut records {
            if let Some((_, count)) = ranked.iter().find(|(id, _)| *id == record.id) {
                record.watchlist_count = Some(*count);
            }
        }

        Ok(records)
    }
}

/// Personalized spotlight shelf, built as an ordered chain of candidate
/// steps. The first step to produce anything wins.
#[derive(Clone)]
pub struct SpotlightService {
    store: Store,
}

impl SpotlightService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn recommendations_for(
        &self,
        user_id: i32,
    ) -> Result<Vec<AnimeRecord>, SpotlightError> {
        let history = self.store.watchlist_count_for_user(user_id).await?;

        // No history at all: skip personalization entirely and serve the
        // site-wide shelf.
        if history == 0 {
            return Ok(PopularTopRatedStep.candidates(&self.store, user_id).await?);
        }

        let frequencies = self.store.user_tag_frequencies(user_id).await?;
        if frequencies.is_empty() {
            return Err(SpotlightError::NoPreferenceSignal);
        }

        let preferred: Vec<String> = frequencies.into_iter().map(|(name, _)| name).collect();

        let steps: Vec<Box<dyn CandidateStep>> = vec![
            Box::new(TagAffinityStep { preferred }),
            Box::new(PopularTopRatedStep),
        ];

        for step in steps {
            let picks = step.candidates(&self.store, user_id).await?;
            if !picks.is_empty() {
                debug!("Spotlight for user {} served by {}", user_id, step.name());
                return Ok(picks);
            }
        }

        Ok(Vec::new())
    }
}
