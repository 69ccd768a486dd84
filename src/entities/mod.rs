pub mod prelude;

pub mod anime;
pub mod anime_tags;
pub mod comments;
pub mod studios;
pub mod tags;
pub mod users;
pub mod watchlist;
