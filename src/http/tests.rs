//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::default()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("nytimes-source/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("q", "Silicon Valley")
        .query("page", "0");

    assert_eq!(config.query.get("q"), Some(&"Silicon Valley".to_string()));
    assert_eq!(config.query.get("page"), Some(&"0".to_string()));
}

#[tokio::test]
async fn test_http_client_sends_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc/search"))
        .and(query_param("q", "Silicon Valley"))
        .and(query_param("page", "2"))
        .and(query_param("api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = RequestConfig::new()
        .query("q", "Silicon Valley")
        .query("page", "2")
        .query("api-key", "secret");

    let response = client()
        .get_with_config(&format!("{}/svc/search", mock_server.uri()), config)
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header(
            "user-agent",
            format!("nytimes-source/{}", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client()
        .get_with_config(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_server_error_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client()
        .get_with_config(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client()
        .get_with_config(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 429, .. }));
}

#[tokio::test]
async fn test_http_client_connection_error_hides_query() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(2))
            .build(),
    )
    .unwrap();
    let config = RequestConfig::new().query("api-key", "SECRET-KEY-1234");

    // Nothing listens on port 1
    let err = client
        .get_with_config("http://127.0.0.1:1/search", config)
        .await
        .unwrap_err();

    match &err {
        Error::Http(inner) => assert!(inner.url().is_none()),
        other => panic!("Expected Http error, got {other:?}"),
    }
    assert!(!err.to_string().contains("SECRET-KEY-1234"));
    assert!(!format!("{err:?}").contains("SECRET-KEY-1234"));
}
