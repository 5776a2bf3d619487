//! Integration tests for the gist service
//!
//! These tests use wiremock to stand in for the gist API and exercise
//! list, get and the on-disk cache end-to-end.

use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gisty::{GistError, GistService, Logger, ServiceConfig, Source};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct RecordingLogger {
    warnings: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn error(&self, _msg: &str) {}

    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }
}

fn service(server: &MockServer) -> GistService {
    GistService::new(ServiceConfig::new("arsham", "sometoken").with_api_base(server.uri()))
        .expect("Failed to create service")
}

fn cached_service(server: &MockServer, dir: &TempDir) -> GistService {
    GistService::new(
        ServiceConfig::new("arsham", "sometoken")
            .with_api_base(server.uri())
            .with_cache_dir(dir.path()),
    )
    .expect("Failed to create service")
}

fn document_body(content: &str) -> serde_json::Value {
    json!({ "files": { "filename": { "content": content } } })
}

#[tokio::test]
async fn test_list_validation_errors() {
    let cases = [
        ("", "", 10, 100),
        ("", "XfJu", 10, 100),
        ("AdthCCaIXhhN", "", 10, 100),
        ("UMgEziO jLGLkhKcjG", "NbkGUkRlQNmIX", 10, 100),
        ("UMgEziOjLGLadfsdfsfdf", "NbkGUkRlQNmIX", 0, 10),
        ("UMgEziOjLGLkhKcjG", "NbkGUkRlQNmIX", 10, -100),
        ("UMgEziOjLGsdfLkhKcjG", "NbkGUkRlQNmIX", -10, 100),
    ];

    for (username, token, per_page, page) in cases {
        let service = GistService::new(ServiceConfig::new(username, token)).unwrap();
        let err = service.list(per_page, page).await.unwrap_err();

        let expected = match (username, token) {
            ("", "") => matches!(err, GistError::EmptyUsername | GistError::EmptyToken),
            ("", _) => matches!(err, GistError::EmptyUsername),
            (_, "") => matches!(err, GistError::EmptyToken),
            (u, _) if u.contains(' ') => matches!(err, GistError::BadUsername),
            _ => matches!(err, GistError::Pagination),
        };
        assert!(expected, "{:?}: unexpected error {:?}", (username, token), err);
        assert!(err.is_validation());
    }
}

#[tokio::test]
async fn test_list_sends_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/arsham/gists"))
        .and(query_param("access_token", "sometoken"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "1b212f0843127d2d061f0d53fb581680",
                "url": "https://api.github.com/gists/1b212f0843127d2d061f0d53fb581680",
                "description": "first",
                "created_at": "2018-03-04T10:20:30Z",
                "updated_at": "2018-03-04T10:20:30Z"
            },
            { "id": "2", "description": null }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summaries = service(&mock_server).list(10, 1).await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, "1b212f0843127d2d061f0d53fb581680");
    assert_eq!(summaries[0].description, "first");
    assert_eq!(summaries[1].id, "2");
    assert_eq!(summaries[1].description, "");
}

#[tokio::test]
async fn test_list_error_status_goes_to_decoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/arsham/gists"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).list(40, 0).await.unwrap_err();
    assert!(matches!(err, GistError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_list_transport_error() {
    // Nothing listens on port 1.
    let service = GistService::new(
        ServiceConfig::new("arsham", "sometoken")
            .with_api_base("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let err = service.list(40, 0).await.unwrap_err();
    assert!(matches!(err, GistError::Transport(_)), "got {:?}", err);
    assert!(!err.to_string().contains("sometoken"));
}

#[tokio::test]
async fn test_get_empty_id_touches_nothing() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = cached_service(&mock_server, &cache_dir);
    assert!(matches!(service.get("").await, Err(GistError::EmptyId)));
    assert!(matches!(service.fetch("").await, Err(GistError::EmptyId)));
    assert_eq!(fs::read_dir(cache_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_get_without_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists/someID"))
        .and(query_param("access_token", "sometoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("something")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = service(&mock_server);
    let first = service.get("someID").await.unwrap();
    let second = service.get("someID").await.unwrap();

    assert_eq!(first.file("filename").unwrap().content, "something");
    assert_eq!(first.url, format!("{}/gists/someID", mock_server.uri()));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_get_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists/someID"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://developer.github.com/v3/gists/#get-a-single-gist"
        })))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).get("someID").await.unwrap_err();
    assert!(matches!(err, GistError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_get_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists/someID"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).get("someID").await.unwrap_err();
    assert!(matches!(err, GistError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_get_uses_cache() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/gists/NPrUmNnyLrgFcwIghuu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("WCLwqKzLvzg")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gists/DFxIrjJLcneZbqcpR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": {
                "file1": { "content": "TLsplcHpevo" },
                "file2": { "content": "mbcFO" }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = cached_service(&mock_server, &cache_dir);

    service.get("NPrUmNnyLrgFcwIghuu").await.unwrap();

    let r2 = service.fetch("DFxIrjJLcneZbqcpR").await.unwrap();
    assert_eq!(r2.source, Source::Remote);
    assert!(r2.cache_error.is_none());

    let r3 = service.fetch("DFxIrjJLcneZbqcpR").await.unwrap();
    assert_eq!(r3.source, Source::Cache);
    assert_eq!(r2.document, r3.document);
    assert_eq!(r3.document.files.len(), 2);

    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cache_survives_new_service() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("kept")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let first = cached_service(&mock_server, &cache_dir).get("abc").await.unwrap();
    let second = cached_service(&mock_server, &cache_dir).get("abc").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("v")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = cached_service(&mock_server, &cache_dir);
    service.get("abc").await.unwrap();
    service.invalidate("abc").unwrap();

    let fetched = service.fetch("abc").await.unwrap();
    assert_eq!(fetched.source, Source::Remote);
    assert!(matches!(service.invalidate(""), Err(GistError::EmptyId)));
}

#[tokio::test]
async fn test_concurrent_gets_share_one_request() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/gists/cold"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(document_body("once"))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = cached_service(&mock_server, &cache_dir);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.get("cold").await }));
    }

    for handle in handles {
        let document = handle.await.unwrap().unwrap();
        assert_eq!(document.file("filename").unwrap().content, "once");
    }
}

#[tokio::test]
async fn test_store_failure_is_reported_separately() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();

    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_body("fresh")))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let service = GistService::new(
        ServiceConfig::new("arsham", "sometoken")
            .with_api_base(mock_server.uri())
            .with_cache_dir(blocker.join("cache"))
            .with_logger(logger.clone()),
    )
    .unwrap();
    // Creating the cache directory already failed.
    assert_eq!(logger.warnings.lock().unwrap().len(), 1);

    let fetched = service.fetch("abc").await.unwrap();
    assert_eq!(fetched.document.file("filename").unwrap().content, "fresh");
    assert!(matches!(fetched.cache_error, Some(GistError::Cache { .. })));

    let document = service.get("abc").await.unwrap();
    assert_eq!(document, fetched.document);
    assert_eq!(logger.warnings.lock().unwrap().len(), 2);
}
