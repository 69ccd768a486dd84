use crate::entities::{prelude::Watchlist, watchlist};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One watchlist row per (user, anime). The unique index makes Add a single
/// conditional insert instead of a racy check-then-insert.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_watchlist_user_anime")
                    .table(Watchlist)
                    .col(watchlist::Column::UserId)
                    .col(watchlist::Column::AnimeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_watchlist_user_anime")
                    .table(Watchlist)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
