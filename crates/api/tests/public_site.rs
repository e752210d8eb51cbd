use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use site_lake_api::config::AppConfig;
use site_lake_api::routes;
use site_lake_api::state::AppState;
use site_lake_core::{MemoryStore, PageStore, PublishedPage, PublishedSite};

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 1,
        db_min_connections: 1,
        public_base_url: "https://sites.example.test".to_string(),
        log_level: "debug".to_string(),
    }
}

fn site(public_id: &str, pages: Vec<PublishedPage>, is_published: bool) -> PublishedSite {
    PublishedSite {
        public_id: public_id.to_string(),
        owner_id: "owner-1".to_string(),
        owner_contact: "owner@example.test".to_string(),
        site_label: "Corner Bakery".to_string(),
        pages,
        published_at: Utc::now(),
        updated_at: Utc::now(),
        is_published,
    }
}

fn page(id: &str, name: &str, html: &str, css: &str) -> PublishedPage {
    PublishedPage {
        name: name.to_string(),
        html: html.to_string(),
        css: css.to_string(),
        id: id.to_string(),
    }
}

async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_site(&site(
            "abc123",
            vec![
                page("p1", "Home", "<div>Hi</div>", "div{color:red}"),
                page("p2", "Menu", "<ul><li>Bread</li></ul>", ""),
            ],
            true,
        ))
        .await
        .unwrap();
    store
        .insert_site(&site("hidden", vec![page("p1", "Home", "<p>x</p>", "")], false))
        .await
        .unwrap();

    routes::build_app(AppState::new(store, test_config()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn renders_first_page_with_styles_and_navigation() {
    let (status, body) = get(app().await, "/sites/abc123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<div>Hi</div>"));
    assert!(body.contains("<style id=\"page-styles\">div{color:red}</style>"));
    assert!(body.contains("site-nav"));
}

#[tokio::test]
async fn page_query_selects_a_page() {
    let (status, body) = get(app().await, "/sites/abc123?page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<li>Bread</li>"));
    assert!(!body.contains("<div>Hi</div>"));
}

#[tokio::test]
async fn unknown_unpublished_and_malformed_ids_are_not_found() {
    for uri in ["/sites/nope", "/sites/hidden", "/sites/bad%20id"] {
        let (status, body) = get(app().await, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("Site Not Found"));
    }
}

#[tokio::test]
async fn json_view_returns_the_published_record() {
    let (status, body) = get(app().await, "/v1/sites/abc123").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["url"], "https://sites.example.test/sites/abc123");
    assert_eq!(json["site"]["siteName"], "Corner Bakery");
    assert_eq!(json["site"]["pages"][0]["html"], "<div>Hi</div>");
    assert!(json["site"]["pages"][0].get("projectData").is_none());

    let (status, body) = get(app().await, "/v1/sites/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["type"], "notFound");
}

#[tokio::test]
async fn health_checks_the_store() {
    let (status, body) = get(app().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"store\":\"connected\""));

    let (status, _) = get(app().await, "/v1/ping").await;
    assert_eq!(status, StatusCode::OK);
}
