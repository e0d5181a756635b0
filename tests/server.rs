//! End-to-end tests against a real listener.

mod common;

use std::fs;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::start_server;
use rapi::config::StaticFilesConfig;
use rapi::demo::{self, PageStore};
use rapi::AppConfig;

#[tokio::test]
async fn test_serves_api_over_tcp() {
    let config = AppConfig::default();
    let router = demo::build_router(&config, PageStore::new());
    let (addr, shutdown) = start_server(config, router).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/api/v1/pages"))
        .json(&json!({"page": {"title": "Over the wire"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"]["title"], "Over the wire");

    let res = client
        .get(format!("http://{addr}/health"))
        .header("x-request-id", "client-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-chosen");

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_is_gzipped_when_accepted() {
    let config = AppConfig::default();
    let router = demo::build_router(&config, PageStore::new());
    let (addr, shutdown) = start_server(config, router).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/api/v1/pages"))
        .header("accept-encoding", "gzip")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-encoding"], "gzip");

    let res = client
        .get(format!("http://{addr}/api/v1/pages"))
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("content-encoding").is_none());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"pages": []}));

    // Plain-text responses are never compressed.
    let res = client
        .get(format!("http://{addr}/missing"))
        .header("accept-encoding", "gzip")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get("content-encoding").is_none());
    assert_eq!(res.text().await.unwrap(), "404 page not found\n");

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/site.css"), "body {}").unwrap();

    let mut config = AppConfig::default();
    config.static_files = Some(StaticFilesConfig {
        prefix: "/assets/".to_string(),
        root: dir.path().to_string_lossy().into_owned(),
        list_directories: false,
        prefer_gzip: false,
    });
    let router = demo::build_router(&config, PageStore::new());
    let (addr, shutdown) = start_server(config, router).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{addr}/assets/site.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "body {}");

    let res = client
        .get(format!("http://{addr}/assets/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}
