use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::{Json, Path, State};
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use gazzetta::application::compose::ComposePostCommand;
use gazzetta::infra::db::{SqliteRepositories, seed_canonical};
use gazzetta::infra::http::api::handlers;
use gazzetta::infra::http::api::models::CreatePostRequest;
use gazzetta::infra::http::{ApiRateLimiter, ApiState, build_router};

fn build_state(pool: SqlitePool) -> ApiState {
    let repos = SqliteRepositories::new(pool);
    let rate_limiter = ApiRateLimiter::new(Duration::from_secs(60), 1000, false);
    ApiState::new(repos, rate_limiter)
}

async fn seeded_state(pool: SqlitePool) -> ApiState {
    let state = build_state(pool);
    seed_canonical(state.db.pool())
        .await
        .expect("seed demo dataset");
    state
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    (status, read_json(response).await)
}

async fn post_json(router: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    (status, read_json(response).await)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// ============ Listing and reading ============

#[sqlx::test(migrations = "./migrations")]
async fn list_posts_returns_seeded_posts_newest_first(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(5));
    let items = body["items"].as_array().expect("items array");
    let ids: Vec<i64> = items.iter().map(|item| item["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);

    // Post 5 belongs to Carlos and carries three tags.
    assert_eq!(items[0]["author"]["name"], json!("Carlos Oliveira"));
    assert_eq!(items[0]["author"]["email"], json!("ca****@email.com"));
    assert_eq!(items[0]["tags"].as_array().unwrap().len(), 3);

    // The oldest post has both of its comments attached, with masked
    // commenter emails.
    let first_post = &items[4];
    let comments = first_post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["author"]["email"], json!("ma***@email.com"));

    // List responses never include a view counter.
    assert!(first_post.get("view_count").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn reading_a_post_increments_its_view_count(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, first) = get_json(&router, "/api/posts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["view_count"], json!(1));
    assert_eq!(first["title"], json!("Introdução ao Node.js"));

    let (_, second) = get_json(&router, "/api/posts/1").await;
    assert_eq!(second["view_count"], json!(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn reading_an_unknown_post_is_not_found(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
}

#[sqlx::test(migrations = "./migrations")]
async fn non_positive_post_ids_are_rejected(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[sqlx::test(migrations = "./migrations")]
async fn posts_by_user_lists_only_their_posts(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/user/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3]);
}

// ============ Creation ============

#[sqlx::test(migrations = "./migrations")]
async fn creating_a_post_resolves_tags_and_records_a_notification(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = post_json(
        &router,
        "/api/posts",
        json!({
            "title": "Guia de arquitetura limpa",
            "content": "um corpo de texto com tamanho suficiente",
            "user_id": 1,
            "tags": ["Rust", "Tecnologia"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"]["email"], json!("jo**@email.com"));
    assert!(body.get("view_count").is_none());

    let tags = body["tags"].as_array().expect("tags array");
    let names: Vec<&str> = tags.iter().map(|tag| tag["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Tecnologia", "Rust"]);
    // Tecnologia already existed in the seed; it must keep its id.
    assert_eq!(tags[0]["id"], json!(1));

    let (status, notifications) = get_json(&router, "/api/notifications").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notifications["count"], json!(1));
    let item = &notifications["items"][0];
    assert_eq!(item["recipient"], json!("joao@email.com"));
    assert_eq!(item["subject"], json!("Post Created"));
    let post_id = body["id"].as_i64().unwrap();
    assert_eq!(
        item["body"],
        json!(format!(
            "Hello João Silva, your post {post_id} has been created successfully!"
        ))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn creating_a_post_with_a_short_title_is_invalid(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = post_json(
        &router,
        "/api/posts",
        json!({
            "title": "ab",
            "content": "um corpo de texto com tamanho suficiente",
            "user_id": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[sqlx::test(migrations = "./migrations")]
async fn flagged_content_is_rejected(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = post_json(
        &router,
        "/api/posts",
        json!({
            "title": "Título aceitável",
            "content": "this body is inappropriate for publication",
            "user_id": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "content_rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn creating_a_post_for_an_unknown_author_fails(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = post_json(
        &router,
        "/api/posts",
        json!({
            "title": "Título aceitável",
            "content": "um corpo de texto com tamanho suficiente",
            "user_id": 99
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "unknown_author");

    let (_, notifications) = get_json(&router, "/api/notifications").await;
    assert_eq!(notifications["count"], json!(0));
}

// ============ Search ============

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_title_and_content_case_insensitively(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/search?term=NODE").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["term"], json!("NODE"));
    // Posts 3 and 4 match on title, post 1 on its body.
    assert_eq!(body["count"], json!(3));
    let ids: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3, 1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_requires_a_term(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");

    let (status, _) = get_json(&router, "/api/posts/search?term=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_treats_like_wildcards_literally(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/search?term=%25").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(0));
}

// ============ Categorization ============

#[sqlx::test(migrations = "./migrations")]
async fn post_category_combines_title_and_tag_keywords(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/1/category").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post_id"], json!(1));
    assert_eq!(body["category"], json!("Tech, Backend"));
    assert_eq!(body["most_popular_category"], json!("Tech, Backend"));
}

#[sqlx::test(migrations = "./migrations")]
async fn category_for_an_unknown_post_is_not_found(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/999/category").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
}

#[sqlx::test(migrations = "./migrations")]
async fn category_stats_count_posts_per_composite_label(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/categories/stats").await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["category_stats"];
    assert_eq!(stats["Tech, Backend"], json!(2));
    assert_eq!(stats["Tech, Programming, Backend"], json!(1));
    assert_eq!(stats["Tech, Optimization, Backend"], json!(1));
    assert_eq!(stats["Tech, Educational, Programming, Advanced"], json!(1));
    assert_eq!(body["total_categories"], json!(4));
    assert_eq!(body["most_popular_category"], json!("Tech, Backend"));
}

// ============ Analytics ============

#[sqlx::test(migrations = "./migrations")]
async fn post_metrics_report_comment_and_tag_counts(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/posts/1/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post_id"], json!(1));
    assert_eq!(body["title"], json!("Introdução ao Node.js"));
    assert_eq!(body["comment_count"], json!(2));
    assert_eq!(body["tag_count"], json!(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn user_stats_aggregate_authored_posts(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/users/2/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(2));
    assert_eq!(body["total_posts"], json!(2));
    assert_eq!(body["total_comments"], json!(2));
    // Posts 3 and 4 share two tags, so the distinct count is three.
    assert_eq!(body["total_tags"], json!(3));
}

#[sqlx::test(migrations = "./migrations")]
async fn user_stats_for_an_unknown_user_are_zeroed(pool: SqlitePool) {
    let router = build_router(seeded_state(pool).await);

    let (status, body) = get_json(&router, "/api/users/42/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_posts"], json!(0));
    assert_eq!(body["total_comments"], json!(0));
    assert_eq!(body["total_tags"], json!(0));
}

// ============ Health and plumbing ============

#[sqlx::test(migrations = "./migrations")]
async fn health_reports_ok_and_a_request_id(pool: SqlitePool) {
    let router = build_router(build_state(pool));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .oneshot(request)
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .expect("header should be ascii");
    assert!(!request_id.is_empty());

    let body = read_json(response).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("ok"));
}

#[sqlx::test(migrations = "./migrations")]
async fn requests_past_the_rate_budget_get_429(pool: SqlitePool) {
    let repos = SqliteRepositories::new(pool);
    seed_canonical(repos.pool()).await.expect("seed demo dataset");
    let state = ApiState::new(repos, ApiRateLimiter::new(Duration::from_secs(60), 2, true));
    let router = build_router(state);

    for _ in 0..2 {
        let (status, _) = get_json(&router, "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
    }

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/posts")
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("60")
    );
    let body = read_json(response).await;
    assert_eq!(error_code(&body), "rate_limited");

    // Health sits outside the API scope and stays reachable.
    let (status, _) = get_json(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

// ============ Handlers called directly ============

#[sqlx::test(migrations = "./migrations")]
async fn handlers_compose_and_read_back_a_post(pool: SqlitePool) {
    let state = seeded_state(pool).await;

    let payload = CreatePostRequest {
        title: "Novo guia de performance".into(),
        content: "texto longo o bastante para publicação".into(),
        user_id: 2,
        tags: vec!["Node.js".into()],
    };

    let _created = handlers::create_post(State(state.clone()), Json(payload))
        .await
        .expect("create post via handler");

    let record = state
        .composer
        .create_post(ComposePostCommand {
            title: "Outro guia de performance".into(),
            content: "texto longo o bastante para publicação".into(),
            user_id: 2,
            tags: Vec::new(),
        })
        .await
        .expect("create post via service");

    let _detail = handlers::get_post(State(state.clone()), Path(record.id))
        .await
        .expect("read post via handler");

    let stats = state
        .analytics
        .user_stats(2)
        .await
        .expect("user stats via service");
    assert_eq!(stats.total_posts, 4);
}
