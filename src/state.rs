use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CatalogService, CommentService, SearchService, SpotlightService, WatchlistService,
};

/// Shared handler state: the store plus one instance of each service. All of
/// it is cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub catalog: CatalogService,
    pub search: SearchService,
    pub spotlight: SpotlightService,
    pub watchlist: WatchlistService,
    pub comments: CommentService,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            config: Arc::new(config),
            catalog: CatalogService::new(store.clone()),
            search: SearchService::new(store.clone()),
            spotlight: SpotlightService::new(store.clone()),
            watchlist: WatchlistService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            store,
        }
    }
}
