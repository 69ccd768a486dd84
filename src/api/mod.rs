use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::state::AppState;

mod anime;
pub mod auth;
mod comments;
mod error;
mod search;
mod watchlist;

pub use error::ApiError;

pub fn router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.server.session_ttl_minutes,
        )));

    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let user_routes = Router::new()
        .route("/spotlight", get(watchlist::spotlight))
        .route(
            "/watchlist",
            get(watchlist::active).post(watchlist::add),
        )
        .route("/watchlist/completed", get(watchlist::completed))
        .route(
            "/watchlist/{anime_id}",
            put(watchlist::update_status).delete(watchlist::remove),
        )
        .route_layer(middleware::from_fn(auth::require_auth));

    let public_routes = Router::new()
        .route("/search", get(search::search))
        .route("/focusanime/{anime_id}", get(anime::focus))
        .route("/anime/animespotlight-animes", get(anime::spotlight))
        .route("/anime/new-animes", get(anime::new_animes))
        .route("/anime/upcoming-animes", get(anime::upcoming))
        .route("/anime/recommended-animes", get(anime::recommended))
        .route("/anime/random-animes", get(anime::random))
        .route("/anime/all-animes", get(anime::all))
        .route("/anime/all-tags", get(anime::all_tags))
        .route("/anime/mostwatchlist-animes", get(anime::most_watchlisted))
        .route(
            "/anime/{anime_id}/comments",
            get(comments::list).post(comments::post),
        )
        .route("/comments/{comment_id}", delete(comments::remove))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .merge(public_routes)
        .nest("/api/user", user_routes)
        .layer(session_layer)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
