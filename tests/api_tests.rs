use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use sea_orm::{EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

use anizora::config::Config;
use anizora::db::Store;
use anizora::entities::{anime, anime_tags, studios, tags, users, watchlist};
use anizora::state::AppState;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // Cheap hashing parameters; production costs are pointless in tests.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

/// Router plus its store, over a freshly seeded in-memory database.
async fn spawn_app() -> (Router, Store) {
    let config = test_config();
    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to create store");

    seed_catalog(&store).await;

    let app = anizora::api::router(AppState::new(store.clone(), config));
    (app, store)
}

/// Catalog fixture:
/// Alpha (Airing 9.2, Action+Drama), Beta (8.4, Action), Gamma (7.1, Drama),
/// Delta (Upcoming 10.0, Isekai), Epsilon (8.9, all three), Zeta (6.0, none).
async fn seed_catalog(store: &Store) {
    studios::Entity::insert_many([
        studios::ActiveModel {
            id: Set(1),
            name: Set("Bones".to_string()),
            rating: Set(Some(8.5)),
        },
        studios::ActiveModel {
            id: Set(2),
            name: Set("MAPPA".to_string()),
            rating: Set(None),
        },
    ])
    .exec(&store.conn)
    .await
    .expect("seed studios");

    let show = |id: i32, title: &str, status: &str, rating: f32, studio_id: i32| {
        anime::ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
            kind: Set("TV".to_string()),
            episodes: Set(Some(12)),
            status: Set(status.to_string()),
            airing_start: Set(Some(format!("2024-0{id}-01"))),
            airing_end: Set(None),
            rating: Set(rating),
            synopsis: Set(None),
            image_url: Set(None),
            studio_id: Set(studio_id),
        }
    };

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

    tags::Entity::insert_many([
        tags::ActiveModel {
            id: Set(1),
            name: Set("Action".to_string()),
        },
        tags::ActiveModel {
            id: Set(2),
            name: Set("Drama".to_string()),
        },
        tags::ActiveModel {
            id: Set(3),
            name: Set("Isekai".to_string()),
        },
    ])
    .exec(&store.conn)
    .await
    .expect("seed tags");

    let link = |anime_id: i32, tag_id: i32| anime_tags::ActiveModel {
        anime_id: Set(anime_id),
        tag_id: Set(tag_id),
    };

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
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request failed")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("no session cookie issued")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response was not JSON")
}

/// Registers a fresh account and returns its session cookie.
async fn register(app: &Router, username: &str) -> String {
    let payload = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "displayName": username,
        "password": "correct-horse-battery",
        "confirmPassword": "correct-horse-battery",
    });

    let response = send(app, json_request("POST", "/auth/register", None, &payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

async fn add_to_watchlist(app: &Router, cookie: &str, anime_id: i32) {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/user/watchlist",
            Some(cookie),
            &json!({ "animeId": anime_id, "status": "Watching" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ===== Catalog & search =====

#[tokio::test]
async fn focus_returns_record_or_404() {
    let (app, _store) = spawn_app().await;

    let response = send(&app, get("/focusanime/1", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Alpha");
    assert_eq!(body["type"], "TV");
    assert_eq!(body["studio_name"], "Bones");
    assert_eq!(body["genres"], "Action, Drama");

    let response = send(&app, get("/focusanime/999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Anime not found");
}

#[tokio::test]
async fn catalog_sections_respect_their_filters() {
    let (app, _store) = spawn_app().await;

    let response = send(&app, get("/anime/animespotlight-animes", None)).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Delta");

    let response = send(&app, get("/anime/recommended-animes", None)).await;
    let body = body_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Delta", "Alpha", "Epsilon", "Beta"]);

    let response = send(&app, get("/anime/all-tags", None)).await;
    let body = body_json(response).await;
    assert_eq!(body, json!(["Action", "Drama", "Isekai"]));
}

#[tokio::test]
async fn search_tag_intersection_and_pagination() {
    let (app, _store) = spawn_app().await;

    let response = send(&app, get("/search?tags=Action,Drama", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["results"][0]["title"], "Alpha");
    assert_eq!(body["results"][1]["title"], "Epsilon");

    // Page far past the end: empty window, total and page intact.
    let response = send(&app, get("/search?page=99", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 6);
    assert_eq!(body["page"], 99);

    // Unknown tag is zero matches, not an error.
    let response = send(&app, get("/search?tags=Mecha", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);
}

// ===== Auth =====

#[tokio::test]
async fn register_conflicts_are_reported_per_field() {
    let (app, _store) = spawn_app().await;
    register(&app, "rin").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "rin",
                "email": "other@example.com",
                "displayName": "Other",
                "password": "correct-horse-battery",
                "confirmPassword": "correct-horse-battery",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Username already taken");

    let response = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "other",
                "email": "rin@example.com",
                "displayName": "Other",
                "password": "correct-horse-battery",
                "confirmPassword": "correct-horse-battery",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Email already registered");
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_issues_sessions() {
    let (app, _store) = spawn_app().await;
    register(&app, "rin").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "rin", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid username or password"
    );

    let response = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "rin", "password": "correct-horse-battery" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let response = send(&app, get("/api/user/watchlist", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_routes_require_a_session() {
    let (app, _store) = spawn_app().await;

    for uri in [
        "/api/user/watchlist",
        "/api/user/watchlist/completed",
        "/api/user/spotlight",
    ] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

// ===== Watchlist =====

#[tokio::test]
async fn duplicate_add_conflicts_and_keeps_one_row() {
    let (app, store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    add_to_watchlist(&app, &cookie, 1).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/user/watchlist",
            Some(&cookie),
            &json!({ "animeId": 1, "status": "Completed" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Anime already in watchlist"
    );

    let rows = watchlist::Entity::find().count(&store.conn).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn add_validates_status_and_anime() {
    let (app, _store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/user/watchlist",
            Some(&cookie),
            &json!({ "animeId": 1, "status": "Dropped" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid status value: Dropped"
    );

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/user/watchlist",
            Some(&cookie),
            &json!({ "animeId": 999, "status": "Watching" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_refreshes_last_updated_and_remove_404s_when_missing() {
    let (app, _store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    add_to_watchlist(&app, &cookie, 1).await;

    let response = send(&app, get("/api/user/watchlist", Some(&cookie))).await;
    let before = body_json(response).await[0]["last_updated"]
        .as_str()
        .unwrap()
        .to_string();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    // Same status; the stamp must still move.
    let response = send(
        &app,
        json_request(
            "PUT",
            "/api/user/watchlist/1",
            Some(&cookie),
            &json!({ "status": "Watching" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/api/user/watchlist", Some(&cookie))).await;
    let body = body_json(response).await;
    let after = body[0]["last_updated"].as_str().unwrap();
    assert!(after > before.as_str());

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/user/watchlist/999")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Watchlist entry not found"
    );
}

#[tokio::test]
async fn completed_view_splits_from_active() {
    let (app, _store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    add_to_watchlist(&app, &cookie, 1).await;
    add_to_watchlist(&app, &cookie, 2).await;

    let response = send(
        &app,
        json_request(
            "PUT",
            "/api/user/watchlist/1",
            Some(&cookie),
            &json!({ "status": "Completed" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&app, get("/api/user/watchlist", Some(&cookie))).await).await;
    let active = body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["title"], "Beta");
    assert_eq!(active[0]["watchlist_status"], "Watching");

    let body = body_json(
        send(&app, get("/api/user/watchlist/completed", Some(&cookie))).await,
    )
    .await;
    let completed = body.as_array().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "Alpha");
}

// ===== Spotlight cascade =====

#[tokio::test]
async fn spotlight_serves_popular_shelf_to_new_users() {
    let (app, _store) = spawn_app().await;

    // Someone else's activity supplies the popularity signal.
    let other = register(&app, "kai").await;
    add_to_watchlist(&app, &other, 2).await;
    add_to_watchlist(&app, &other, 3).await;

    let cookie = register(&app, "rin").await;
    let response = send(&app, get("/api/user/spotlight", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    // Beta (8.4) clears the floor, Gamma (7.1) does not.
    assert_eq!(titles, vec!["Beta"]);
}

#[tokio::test]
async fn spotlight_ranks_tag_matches_for_users_with_history() {
    let (app, _store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    // Beta is Action-tagged; Action becomes the preference signal.
    add_to_watchlist(&app, &cookie, 2).await;

    let response = send(&app, get("/api/user/spotlight", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alpha", "Epsilon"]);
}

#[tokio::test]
async fn spotlight_reports_missing_preference_signal() {
    let (app, _store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    // Zeta has no tags; history exists but carries no signal.
    add_to_watchlist(&app, &cookie, 6).await;

    let response = send(&app, get("/api/user/spotlight", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "No tag data found for user."
    );
}

// ===== Comments =====

#[tokio::test]
async fn comment_lifecycle_with_role_checks() {
    let (app, store) = spawn_app().await;
    let cookie = register(&app, "rin").await;

    // Posting requires a session.
    let response = send(
        &app,
        json_request(
            "POST",
            "/anime/1/comments",
            None,
            &json!({ "body": "great" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Whitespace-only bodies are rejected.
    let response = send(
        &app,
        json_request(
            "POST",
            "/anime/1/comments",
            Some(&cookie),
            &json!({ "body": "   " }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(
            "POST",
            "/anime/1/comments",
            Some(&cookie),
            &json!({ "body": "  great pacing  " }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let posted = body_json(response).await;
    assert_eq!(posted["body"], "great pacing");
    assert_eq!(posted["display_name"], "rin");
    let comment_id = posted["id"].as_i64().unwrap();

    // Public listing, joined with the author.
    let response = send(&app, get("/anime/1/comments", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Plain users cannot delete.
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/comments/{comment_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Promote a second account to admin; a fresh login picks up the role.
    register(&app, "moderator").await;
    promote_to_admin(&store, "moderator").await;
    let admin_cookie = login(&app, "moderator").await;

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/comments/{comment_id}"))
            .header(header::COOKIE, &admin_cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/anime/1/comments", None)).await;
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

async fn promote_to_admin(store: &Store, username: &str) {
    use sea_orm::{ColumnTrait, QueryFilter};

    users::Entity::update_many()
        .col_expr(
            users::Column::Role,
            sea_orm::sea_query::Expr::value("admin"),
        )
        .filter(users::Column::Username.eq(username))
        .exec(&store.conn)
        .await
        .expect("promote user");
}

async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": username, "password": "correct-horse-battery" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}
