//! Integration tests for `RaterClient` using wiremock HTTP mocks.

use serde_json::json;
use trailhead_rater::{RaterClient, RaterError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RaterClient {
    RaterClient::with_base_url("test-key", "test-model", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn rate_trail_returns_the_model_answer() {
    let server = MockServer::start().await;

    let body = json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "Difficult"}],
        "model": "test-model",
        "stop_reason": "end_turn"
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rating = client
        .rate_trail("South Kaibab Trail", "Steep, exposed, no water.", "https://example.gov")
        .await
        .expect("rating should succeed");

    assert_eq!(rating, "Difficult");
}

#[tokio::test]
async fn off_vocabulary_answers_fall_back_to_moderate() {
    let server = MockServer::start().await;

    let body = json!({
        "content": [{"type": "text", "text": "Somewhat challenging"}]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rating = client
        .rate_trail("Rim Trail", "Flat and paved.", "https://example.gov")
        .await
        .expect("rating should succeed");

    assert_eq!(rating, "Moderate");
}

#[tokio::test]
async fn api_errors_surface_with_their_message() {
    let server = MockServer::start().await;

    let body = json!({
        "type": "error",
        "error": {"type": "authentication_error", "message": "invalid x-api-key"}
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .rate_trail("Rim Trail", "Flat and paved.", "https://example.gov")
        .await;

    match result {
        Err(RaterError::ApiStatus { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid x-api-key");
        }
        other => panic!("expected ApiStatus error, got: {other:?}"),
    }
}

#[tokio::test]
async fn response_without_text_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"content": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .rate_trail("Rim Trail", "Flat and paved.", "https://example.gov")
        .await;

    assert!(matches!(result, Err(RaterError::EmptyResponse)));
}
