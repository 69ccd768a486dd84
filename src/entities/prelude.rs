pub use super::anime::Entity as Anime;
pub use super::anime_tags::Entity as AnimeTags;
pub use super::comments::Entity as Comments;
pub use super::studios::Entity as Studios;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
pub use super::watchlist::Entity as Watchlist;
