mod common;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use common::{FakeRedirectRepository, bearer, create_test_state, permanent, with_peer_addr};
use serde_json::{Value, json};
use std::sync::Arc;
use tour_redirects::routes::app_router;

fn make_server(repo: Arc<FakeRedirectRepository>) -> TestServer {
    let (state, _rx) = create_test_state(repo);
    TestServer::new(with_peer_addr(app_router(state))).unwrap()
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    let response = server.get("/api/redirects").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    server
        .get("/api/redirects")
        .add_header(header::AUTHORIZATION, "Bearer not-the-token")
        .await
        .assert_status_unauthorized();
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_rules() {
    let mut inactive = permanent(2, "/c", "/d");
    inactive.is_active = false;
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![
        permanent(1, "/a", "/b"),
        inactive,
    ]));
    let server = make_server(repo);

    let response = server
        .get("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["kind"], "permanent");
}

#[tokio::test]
async fn test_create_rule_is_served_immediately() {
    let repo = Arc::new(FakeRedirectRepository::new());
    let server = make_server(repo.clone());

    // Cache "no redirect" for the path first.
    server.get("/spring-tours").await.assert_status_not_found();

    let response = server
        .post("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({
            "source_path": "/Spring-Tours",
            "destination_path": "/tours/spring",
            "kind": "temporary"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["source_path"], "/Spring-Tours");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["hit_count"], 0);

    let redirect = server.get("/spring-tours/").await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header(header::LOCATION), "/tours/spring");
}

#[tokio::test]
async fn test_created_non_ascii_rule_redirects_browser_requests() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    server
        .post("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({
            "source_path": "/safari/übersicht",
            "destination_path": "/safari"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/safari/%C3%BCbersicht").await;
    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header(header::LOCATION), "/safari");
}

#[tokio::test]
async fn test_create_rejects_percent_encoded_source() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    server
        .post("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({
            "source_path": "/safari/%C3%BCbersicht",
            "destination_path": "/safari"
        }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    let response = server
        .post("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({
            "source_path": "no-leading-slash",
            "destination_path": "//evil.example.com"
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_duplicate_active_source_conflicts() {
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![permanent(
        1, "/tours", "/b",
    )]));
    let server = make_server(repo);

    server
        .post("/api/redirects")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({
            "source_path": "/TOURS/",
            "destination_path": "/elsewhere"
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_missing_rule() {
    let server = make_server(Arc::new(FakeRedirectRepository::new()));

    server
        .get("/api/redirects/42")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_deactivate_rule_stops_redirect() {
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![permanent(
        1, "/a", "/b",
    )]));
    let server = make_server(repo);

    server
        .get("/a")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    let response = server
        .patch("/api/redirects/1")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({ "is_active": false }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["is_active"], false);

    server.get("/a").await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_destination_is_served_immediately() {
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![permanent(
        1, "/a", "/b",
    )]));
    let server = make_server(repo);

    assert_eq!(server.get("/a").await.header(header::LOCATION), "/b");

    server
        .patch("/api/redirects/1")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({ "destination_path": "/c", "kind": "temporary" }))
        .await
        .assert_status_ok();

    let response = server.get("/a").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), "/c");
}

#[tokio::test]
async fn test_delete_rule_stops_redirect() {
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![permanent(
        1, "/a", "/b",
    )]));
    let server = make_server(repo);

    server
        .get("/a")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    server
        .delete("/api/redirects/1")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get("/a").await.assert_status_not_found();

    server
        .delete("/api/redirects/1")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .assert_status_not_found();
}

// ─── Cache endpoints ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cache_stats_and_manual_invalidation() {
    let repo = Arc::new(FakeRedirectRepository::with_rules(vec![permanent(
        1, "/a", "/b",
    )]));
    let server = make_server(repo.clone());

    server.get("/a").await;
    server.get("/missing").await;

    let stats: Value = server
        .get("/api/cache")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .json();
    assert_eq!(stats["snapshot_loaded"], true);
    assert_eq!(stats["snapshot_rules"], 1);
    assert_eq!(stats["entries"], 2);

    // A rule added directly in the database stays invisible until invalidation.
    repo.insert(permanent(2, "/missing", "/found"));
    server.get("/missing").await.assert_status_not_found();

    server
        .delete("/api/cache")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let stats: Value = server
        .get("/api/cache")
        .add_header(header::AUTHORIZATION, bearer())
        .await
        .json();
    assert_eq!(stats["snapshot_loaded"], false);
    assert!(stats["snapshot_age_ms"].is_null());

    let response = server.get("/missing").await;
    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header(header::LOCATION), "/found");
    assert_eq!(repo.fetch_count(), 2);
}
