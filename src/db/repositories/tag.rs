use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{anime_tags, prelude::*, tags, watchlist};

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn all_names(&self) -> anyhow::Result<Vec<String>> {
        let names: Vec<String> = Tags::find()
            .select_only()
            .column(tags::Column::Name)
            .distinct()
            .order_by_asc(tags::Column::Name)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    /// Ids of anime carrying every tag in `names` (intersection semantics).
    /// Matching tag rows are grouped per anime and only groups whose distinct
    /// match count equals the requested set size survive.
    pub async fn anime_ids_with_all_tags(&self, names: &[String]) -> anyhow::Result<Vec<i32>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut requested: Vec<String> = names.to_vec();
        requested.sort_unstable();
        requested.dedup();
        let wanted = requested.len() as i64;

        let rows: Vec<(i32, i64)> = AnimeTags::find()
            .select_only()
            .column(anime_tags::Column::AnimeId)
            .column_as(
                Expr::col((tags::Entity, tags::Column::Name)).count_distinct(),
                "matched",
            )
            .join(JoinType::InnerJoin, anime_tags::Relation::Tags.def())
            .filter(tags::Column::Name.is_in(requested))
            .group_by(anime_tags::Column::AnimeId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|(_, matched)| *matched == wanted)
            .map(|(id, _)| id)
            .collect())
    }

    /// Distinct ids of anime carrying at least one of the tags in `names`.
    pub async fn anime_ids_with_any_tag(&self, names: &[String]) -> anyhow::Result<Vec<i32>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = AnimeTags::find()
            .select_only()
            .column(anime_tags::Column::AnimeId)
            .distinct()
            .join(JoinType::InnerJoin, anime_tags::Relation::Tags.def())
            .filter(tags::Column::Name.is_in(names.to_vec()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids)
    }

    /// Tag frequency across every watchlist entry of `user_id` (any status),
    /// most frequent first. The affinity signal of the spotlight cascade.
    pub async fn user_tag_frequencies(&self, user_id: i32) -> anyhow::Result<Vec<(String, i64)>> {
        let stmt = Query::select()
            .column((tags::Entity, tags::Column::Name))
            .expr_as(
                Expr::col((anime_tags::Entity, anime_tags::Column::TagId)).count(),
                Alias::new("cnt"),
            )
            .from(Watchlist)
            .inner_join(
                AnimeTags,
                Expr::col((anime_tags::Entity, anime_tags::Column::AnimeId))
                    .equals((watchlist::Entity, watchlist::Column::AnimeId)),
            )
            .inner_join(
                Tags,
                Expr::col((tags::Entity, tags::Column::Id))
                    .equals((anime_tags::Entity, anime_tags::Column::TagId)),
            )
            .and_where(Expr::col((watchlist::Entity, watchlist::Column::UserId)).eq(user_id))
            .group_by_col((tags::Entity, tags::Column::Name))
            .order_by(Alias::new("cnt"), Order::Desc)
            .to_owned();

        let backend = self.conn.get_database_backend();
        let rows = self.conn.query_all(backend.build(&stmt)).await?;

        let mut frequencies = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("", "name")?;
            let count: i64 = row.try_get("", "cnt")?;
            frequencies.push((name, count));
        }

        Ok(frequencies)
    }
}
