//! HTTP adapter behavior against a mock backend.

#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use queledoy_client::{ApiError, ErrorKind, HttpClient, Session};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TOKEN, UNREACHABLE, config, http_client, signed_in_session};

#[tokio::test]
async fn test_attaches_bearer_token_when_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let value = client.get("/lists").await.unwrap();
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn test_omits_authorization_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), Session::new());
    client.get("/products").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_token_follows_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let session = signed_in_session();
    let client = http_client(&server.uri(), session.clone());
    client.get("/lists").await.unwrap();
    session.sign_out();
    client.get("/lists").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_some());
    assert!(requests[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .and(body_json(json!({ "name": "Birthday", "description": "" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let value = client
        .post("/lists", &json!({ "name": "Birthday", "description": "" }))
        .await
        .unwrap();
    assert_eq!(value["id"], 7);
}

#[tokio::test]
async fn test_not_found_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Lista no encontrada" })),
        )
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let err = client.get("/lists/99").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound("Lista no encontrada".to_string()));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let err = client.get("/lists").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_client_error_is_transport_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "token expired" })))
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let err = client.get("/lists").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Transport {
            status: Some(401),
            message: "token expired".to_string(),
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_success_body_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    let err = client.get("/lists").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/lists/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = http_client(&server.uri(), signed_in_session());
    assert_eq!(client.delete("/lists/7").await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_timeout_is_transport_without_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config(&server.uri()).with_timeout(Duration::from_millis(100));
    let client = HttpClient::new(&config, signed_in_session()).unwrap();

    let err = client.get("/lists").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_without_status() {
    let client = http_client(UNREACHABLE, signed_in_session());
    let err = client.get("/lists").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Transport {
            status: None,
            message: "could not reach the server".to_string(),
        }
    );
}
