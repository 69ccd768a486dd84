use sea_orm::{EntityTrait, Set};

use crate::db::Store;
use crate::entities::{anime, anime_tags, studios, tags, users};

/// In-memory store seeded with a small catalog:
///
/// | id | title   | status    | rating | studio | tags                  |
/// |----|---------|-----------|--------|--------|-----------------------|
/// | 1  | Alpha   | Airing    | 9.2    | Bones  | Action, Drama         |
/// | 2  | Beta    | Completed | 8.4    | MAPPA  | Action                |
/// | 3  | Gamma   | Completed | 7.1    | Bones  | Drama                 |
/// | 4  | Delta   | Upcoming  | 10.0   | MAPPA  | Isekai                |
/// | 5  | Epsilon | Completed | 8.9    | Bones  | Action, Drama, Isekai |
/// | 6  | Zeta    | Completed | 6.0    | MAPPA  | (none)                |
///
/// Users 1-3 exist with no watchlist entries or comments.
pub async fn seeded_store() -> Store {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("in-memory store");

    studios::Entity::insert_many([
        studio(1, "Bones", Some(8.5)),
        studio(2, "MAPPA", None),
    ])
    .exec(&store.conn)
    .await
    .expect("seed studios");

    anime::Entity::insert_many([
        show(1, "Alpha", "Airing", 9.2, 1),
        show(2, "Beta", "Completed", 8.4, 2),
        show(3, "Gamma", "Completed", 7.1, 1),
        show(4, "Delta", "Upcoming", 10.0, 2),
        show(5, "Epsilon", "Completed", 8.9, 1),
        show(6, "Zeta", "Completed", 6.0, 2),
    ])
    .exec(&store.conn)
    .await
    .expect("seed anime");

    tags::Entity::insert_many([tag(1, "Action"), tag(2, "Drama"), tag(3, "Isekai")])
        .exec(&store.conn)
        .await
        .expect("seed tags");

    anime_tags::Entity::insert_many([
        link(1, 1),
        link(1, 2),
        link(2, 1),
        link(3, 2),
        link(4, 3),
        link(5, 1),
        link(5, 2),
        link(5, 3),
    ])
    .exec(&store.conn)
    .await
    .expect("seed tag links");

    users::Entity::insert_many([
        account(1, "rin", "user"),
        account(2, "kai", "user"),
        account(3, "moderator", "admin"),
    ])
    .exec(&store.conn)
    .await
    .expect("seed users");

    store
}

fn studio(id: i32, name: &str, rating: Option<f32>) -> studios::ActiveModel {
    studios::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        rating: Set(rating),
    }
}

fn show(id: i32, title: &str, status: &str, rating: f32, studio_id: i32) -> anime::ActiveModel {
    anime::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        kind: Set("TV".to_string()),
        episodes: Set(Some(12)),
        status: Set(status.to_string()),
        airing_start: Set(Some(format!("2024-0{id}-01"))),
        airing_end: Set(None),
        rating: Set(rating),
        synopsis: Set(Some(format!("{title} synopsis"))),
        image_url: Set(None),
        studio_id: Set(studio_id),
    }
}

fn tag(id: i32, name: &str) -> tags::ActiveModel {
    tags::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
    }
}

fn link(anime_id: i32, tag_id: i32) -> anime_tags::ActiveModel {
    anime_tags::ActiveModel {
        anime_id: Set(anime_id),
        tag_id: Set(tag_id),
    }
}

fn account(id: i32, name: &str, role: &str) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(id),
        username: Set(name.to_string()),
        email: Set(format!("{name}@example.com")),
        display_name: Set(name.to_string()),
        password_hash: Set("$argon2id$v=19$m=8192,t=3,p=1$c2VlZA$seed".to_string()),
        role: Set(role.to_string()),
        created_at: Set("2024-01-01T00:00:00Z".to_string()),
        first_login: Set(None),
        last_login: Set(None),
    }
}
