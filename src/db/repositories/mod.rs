pub mod anime;
pub mod comment;
pub mod tag;
pub mod user;
pub mod watchlist;
