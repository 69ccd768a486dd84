pub mod catalog;
pub mod comments;
pub mod search;
pub mod spotlight;
pub mod watchlist;

pub use catalog::CatalogService;
pub use comments::{CommentError, CommentService};
pub use search::{SearchPage, SearchParams, SearchService};
pub use spotlight::{SpotlightError, SpotlightService};
pub use watchlist::{WatchlistError, WatchlistService};

#[cfg(test)]
pub(crate) mod testutil;
