pub mod limits {

    /// Fixed page size of the catalog search endpoint.
    pub const SEARCH_PAGE_SIZE: u64 = 51;

    /// Page size used by the dashboard watchlist views.
    pub const WATCHLIST_PAGE_SIZE: u64 = 26;

    pub const SPOTLIGHT_LIMIT: u64 = 10;

    pub const RANDOM_LIMIT: u64 = 5;

    pub const RECOMMENDED_LIMIT: u64 = 15;

    pub const MOST_WATCHLISTED_LIMIT: u64 = 30;
}

pub mod ratings {

    /// Minimum rating for an anime to qualify for personalized spotlight
    /// recommendations and their fallbacks.
    pub const SPOTLIGHT_FLOOR: f32 = 8.0;

    /// Minimum rating for the homepage spotlight carousel.
    pub const HOMEPAGE_SPOTLIGHT_FLOOR: f32 = 10.0;

    /// Floor of the fixed "recommended" shelf.
    pub const RECOMMENDED_FLOOR: f32 = 8.0;
}
