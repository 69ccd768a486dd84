use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Format of the show: "TV", "Movie", "OVA", "Special", ...
    pub kind: String,
    pub episodes: Option<i32>,
    /// Lifecycle status: "Airing", "Upcoming", "Completed", ...
    pub status: String,
    pub airing_start: Option<String>,
    pub airing_end: Option<String>,
    /// 0-10 scale.
    pub rating: f32,
    pub synopsis: Option<String>,
    pub image_url: Option<String>,
    pub studio_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::studios::Entity",
        from = "Column::StudioId",
        to = "super::studios::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Studios,
    #[sea_orm(has_many = "super::anime_tags::Entity")]
    AnimeTags,
    #[sea_orm(has_many = "super::watchlist::Entity")]
    Watchlist,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::studios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Studios.def()
    }
}

impl Related<super::watchlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Watchlist.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::anime_tags::Relation::Tags.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::anime_tags::Relation::Anime.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
