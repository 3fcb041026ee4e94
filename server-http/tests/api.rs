use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server_http::{AppState, build_router};
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(AppState::new(Duration::from_secs(900)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_item(app: &Router, title: &str, priority: i32) -> u64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/admin/items",
            json!({ "title": title, "display_priority": priority }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body).unwrap();
    created["id"].as_u64().unwrap()
}

async fn put_settings(app: &Router, settings: Value) {
    let (status, _) = send(app, json_request("PUT", "/admin/settings", settings)).await;
    assert_eq!(status, StatusCode::OK);
}

/// Let the invalidation consumer drain the event bus.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn api_ids(body: &[u8]) -> Vec<u64> {
    let items: Vec<Value> = serde_json::from_slice(body).unwrap();
    items.iter().map(|i| i["id"].as_u64().unwrap()).collect()
}

/// Ids in document order, pulled out of `data-id="N"` attributes.
fn rendered_ids(html: &str) -> Vec<u64> {
    html.match_indices("data-id=\"")
        .map(|(at, marker)| {
            let rest = &html[at + marker.len()..];
            let end = rest.find('"').unwrap();
            rest[..end].parse().unwrap()
        })
        .collect()
}

#[tokio::test]
async fn api_orders_by_priority_and_respects_limit() {
    let app = test_app();
    let low = create_item(&app, "low", 5).await;
    let high = create_item(&app, "high", 10).await;
    create_item(&app, "bottom", 1).await;
    settle().await;

    let (status, body) = send(&app, get("/v1/promos?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(api_ids(&body), vec![high, low]);
}

#[tokio::test]
async fn api_rejects_out_of_range_limits() {
    let app = test_app();

    for uri in ["/v1/promos?limit=0", "/v1/promos?limit=51"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let error: Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].as_str().unwrap().starts_with("invalid_limit"));
    }

    // Absent limit falls back to the default, it is not an error.
    let (status, _) = send(&app, get("/v1/promos")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn disabled_feature_has_three_distinct_surface_behaviors() {
    let app = test_app();
    create_item(&app, "hidden", 1).await;
    put_settings(
        &app,
        json!({
            "feature_enabled": false,
            "max_blocks": 5,
            "cache_ttl_minutes": 30,
            "ajax_enabled": false
        }),
    )
    .await;

    // Public API: explicit 403 with a machine-readable reason.
    let (status, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "feature_disabled");

    // Direct render: empty output, not an error.
    let (status, body) = send(&app, get("/promos/render")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    // Async fetch: 403 even with a token that would otherwise be fine.
    let (status, body) = send(
        &app,
        json_request("POST", "/promos/load", json!({ "token": "irrelevant" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["success"], false);
}

#[tokio::test]
async fn direct_render_and_api_agree_on_the_selection() {
    let app = test_app();
    create_item(&app, "a", 3).await;
    create_item(&app, "b", 9).await;
    create_item(&app, "c", 6).await;
    settle().await;

    let (_, api_body) = send(&app, get("/v1/promos?limit=5")).await;
    let (status, html_body) = send(&app, get("/promos/render")).await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(html_body).unwrap();
    assert_eq!(
        rendered_ids(&html),
        api_ids(&api_body),
        "rendered surface and API must agree on ids and order"
    );
}

#[tokio::test]
async fn item_mutation_invalidates_every_cached_selection() {
    let app = test_app();
    let first = create_item(&app, "first", 5).await;
    settle().await;

    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![first]);

    // The cached slot is still within TTL; the ItemChanged event is what
    // must drop it.
    let second = create_item(&app, "second", 50).await;
    settle().await;

    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![second, first]);
}

#[tokio::test]
async fn manual_cache_clear_drops_every_cached_slot() {
    let state = AppState::new(Duration::from_secs(900));
    let app = build_router(state.clone());

    let item = create_item(&app, "only", 1).await;
    settle().await;

    // Fill two distinct slots, then watch the clear empty the cache itself.
    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![item]);
    let (_, _) = send(&app, get("/v1/promos?limit=3")).await;
    assert_eq!(state.cache.slot_count(), 2);

    let (status, _) = send(
        &app,
        json_request("POST", "/admin/cache/clear", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    settle().await;

    assert_eq!(state.cache.slot_count(), 0, "clear must drop cached slots");

    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![item]);
}

#[tokio::test]
async fn ajax_mode_round_trip_uses_the_issued_token() {
    let app = test_app();
    create_item(&app, "deferred", 2).await;
    put_settings(
        &app,
        json!({
            "feature_enabled": true,
            "max_blocks": 5,
            "cache_ttl_minutes": 30,
            "ajax_enabled": true
        }),
    )
    .await;
    settle().await;

    // Render emits the placeholder with a fresh token instead of content.
    let (status, body) = send(&app, get("/promos/render")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("promo-blocks-placeholder"));

    let token_at = html.find("data-token=\"").unwrap() + "data-token=\"".len();
    let token = &html[token_at..token_at + 64];

    let (status, body) = send(
        &app,
        json_request("POST", "/promos/load", json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let load: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(load["success"], true);
    assert!(load["html"].as_str().unwrap().contains("deferred"));

    // A made-up token is rejected.
    let (status, _) = send(
        &app,
        json_request("POST", "/promos/load", json!({ "token": "forged" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn settings_update_clamps_at_the_persistence_boundary() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/admin/settings",
            json!({
                "feature_enabled": true,
                "max_blocks": 500,
                "cache_ttl_minutes": 99999,
                "ajax_enabled": false
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let settings: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(settings["max_blocks"], 50);
    assert_eq!(settings["cache_ttl_minutes"], 1440);
}

#[tokio::test]
async fn admin_item_read_returns_the_stored_item_or_404() {
    let app = test_app();
    let id = create_item(&app, "readable", 4).await;

    let (status, body) = send(&app, get(&format!("/admin/items/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let item: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(item["title"], "readable");
    assert_eq!(item["display_priority"], 4);

    let (status, body) = send(&app, get("/admin/items/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "item_not_found");
}

#[tokio::test]
async fn deleting_an_item_removes_it_from_the_next_selection() {
    let app = test_app();
    let keep = create_item(&app, "keep", 1).await;
    let drop_id = create_item(&app, "drop", 9).await;
    settle().await;

    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![drop_id, keep]);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/admin/items/{drop_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    settle().await;

    let (_, body) = send(&app, get("/v1/promos")).await;
    assert_eq!(api_ids(&body), vec![keep]);
}
