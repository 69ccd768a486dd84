pub mod anime;
pub mod comment;
pub mod user;
pub mod watchlist;

pub use anime::AnimeRecord;
pub use comment::CommentRecord;
pub use user::{SessionUser, User};
pub use watchlist::{WatchStatus, WatchlistRecord};
