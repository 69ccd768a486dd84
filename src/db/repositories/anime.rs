use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Statement,
};

use crate::entities::{anime, anime_tags, prelude::*, studios, tags};
use crate::models::AnimeRecord;

/// Variable predicate over the catalog. All present fields are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    pub studio_name: Option<String>,
    pub rating_eq: Option<f32>,
    pub min_rating: Option<f32>,
    pub status_eq: Option<String>,
    pub id_in: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Copy)]
pub enum CatalogOrder {
    TitleAsc,
    AiringStartDesc,
    RatingDesc,
}

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn apply_filter(
        select: sea_orm::SelectTwo<anime::Entity, studios::Entity>,
        filter: &CatalogFilter,
    ) -> sea_orm::SelectTwo<anime::Entity, studios::Entity> {
        let mut select = select;

        if let Some(title) = &filter.title_contains {
            if !title.is_empty() {
                select = select.filter(anime::Column::Title.contains(title));
            }
        }
        if let Some(studio) = &filter.studio_name {
            select = select.filter(studios::Column::Name.eq(studio));
        }
        if let Some(rating) = filter.rating_eq {
            select = select.filter(anime::Column::Rating.eq(rating));
        }
        if let Some(floor) = filter.min_rating {
            select = select.filter(anime::Column::Rating.gte(floor));
        }
        if let Some(status) = &filter.status_eq {
            select = select.filter(anime::Column::Status.eq(status));
        }
        if let Some(ids) = &filter.id_in {
            select = select.filter(anime::Column::Id.is_in(ids.clone()));
        }

        select
    }

    /// Paginated window over the catalog matching `filter`. Genres are
    /// aggregated per anime in a second batched query, so the N-M tag join
    /// never duplicates rows.
    pub async fn list(
        &self,
        filter: &CatalogFilter,
        order: CatalogOrder,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        let mut select =
            Self::apply_filter(Anime::find().find_also_related(studios::Entity), filter);

        select = match order {
            CatalogOrder::TitleAsc => select.order_by_asc(anime::Column::Title),
            CatalogOrder::AiringStartDesc => select.order_by_desc(anime::Column::AiringStart),
            CatalogOrder::RatingDesc => select.order_by_desc(anime::Column::Rating),
        };

        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        if let Some(offset) = offset {
            select = select.offset(offset);
        }

        let rows = select.all(&self.conn).await?;
        self.assemble(rows).await
    }

    /// Count of catalog rows matching the same predicate, computed without
    /// the pagination window.
    pub async fn count(&self, filter: &CatalogFilter) -> anyhow::Result<u64> {
        let select =
            Self::apply_filter(Anime::find().find_also_related(studios::Entity), filter);
        Ok(select.count(&self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> anyhow::Result<Option<AnimeRecord>> {
        let row = Anime::find_by_id(id)
            .find_also_related(studios::Entity)
            .one(&self.conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.assemble(vec![row]).await?.into_iter().next())
    }

    /// Loads records for `ids`, preserving the order of `ids`. Used by the
    /// popularity-ordered and random queries, which rank ids first.
    pub async fn list_by_ids_ordered(&self, ids: &[i32]) -> anyhow::Result<Vec<AnimeRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Anime::find()
            .filter(anime::Column::Id.is_in(ids.to_vec()))
            .find_also_related(studios::Entity)
            .all(&self.conn)
            .await?;

        let mut by_id: HashMap<i32, AnimeRecord> = self
            .assemble(rows)
            .await?
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Random sample of catalog ids.
    pub async fn random_ids(&self, limit: u64) -> anyhow::Result<Vec<i32>> {
        let backend = self.conn.get_database_backend();
        let rows = self
            .conn
            .query_all(Statement::from_string(
                backend,
                format!("SELECT id FROM anime ORDER BY RANDOM() LIMIT {limit}"),
            ))
            .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get::<i32>("", "id")?);
        }
        Ok(ids)
    }

    /// Joins the raw rows with their sorted, deduplicated genre strings.
    async fn assemble(
        &self,
        rows: Vec<(anime::Model, Option<studios::Model>)>,
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        let ids: Vec<i32> = rows.iter().map(|(a, _)| a.id).collect();
        let genres = self.genres_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(model, studio)| {
                let genre_list = genres.get(&model.id).cloned().unwrap_or_default();
                AnimeRecord {
                    id: model.id,
                    title: model.title,
                    kind: model.kind,
                    episodes: model.episodes,
                    status: model.status,
                    airing_start: model.airing_start,
                    airing_end: model.airing_end,
                    rating: model.rating,
                    synopsis: model.synopsis,
                    image_url: model.image_url,
                    studio_name: studio.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
                    studio_rating: studio.and_then(|s| s.rating),
                    genres: genre_list.join(", "),
                    watchlist_count: None,
                }
            })
            .collect())
    }

    async fn genres_for(&self, ids: &[i32]) -> anyhow::Result<HashMap<i32, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = AnimeTags::find()
            .filter(anime_tags::Column::AnimeId.is_in(ids.to_vec()))
            .find_also_related(tags::Entity)
            .all(&self.conn)
            .await?;

        let mut map: HashMap<i32, Vec<String>> = HashMap::new();
        for (link, tag) in rows {
            if let Some(tag) = tag {
                map.entry(link.anime_id).or_default().push(tag.name);
            }
        }

        for names in map.values_mut() {
            names.sort_unstable();
            names.dedup();
        }

        Ok(map)
    }

    /// Ids of anime joined to at least one watchlist row, ranked by how many
    /// watchlists they appear in.
    pub async fn most_watchlisted_ids(&self, limit: Option<u64>) -> anyhow::Result<Vec<(i32, i64)>> {
        use crate::entities::watchlist;

        let mut select = Watchlist::find()
            .select_only()
            .column(watchlist::Column::AnimeId)
            .column_as(watchlist::Column::Id.count(), "cnt")
            .group_by(watchlist::Column::AnimeId)
            .order_by(watchlist::Column::Id.count(), Order::Desc);

        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        Ok(select.into_tuple::<(i32, i64)>().all(&self.conn).await?)
    }
}
