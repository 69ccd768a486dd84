use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::anime_tags::Entity")]
    AnimeTags,
}

impl Related<super::anime::Entity> for Entity {
    fn to() -> RelationDef {
        super::anime_tags::Relation::Anime.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::anime_tags::Relation::Tags.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
