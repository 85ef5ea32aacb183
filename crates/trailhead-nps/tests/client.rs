//! Integration tests for `NpsClient` using wiremock HTTP mocks.

use serde_json::json;
use trailhead_nps::{Endpoint, NpsClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NpsClient {
    NpsClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_all_walks_pages_until_empty() {
    let server = MockServer::start().await;

    let page1 = json!({
        "total": "3", "limit": "50", "start": "0",
        "data": [
            {"parkCode": "yell", "fullName": "Yellowstone National Park"},
            {"parkCode": "grca", "fullName": "Grand Canyon National Park"},
            {"parkCode": "zion", "fullName": "Zion National Park"}
        ]
    });
    let empty = json!({"total": "3", "limit": "50", "start": "50", "data": []});

    Mock::given(method("GET"))
        .and(path("/parks"))
        .and(query_param("start", "0"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/parks"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client.fetch_all(Endpoint::Parks).await.expect("fetch_all");

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["parkCode"], "yell");
}

#[tokio::test]
async fn parks_maps_items_and_skips_malformed_ones() {
    let server = MockServer::start().await;

    let page1 = json!({
        "data": [
            {
                "parkCode": "acad",
                "fullName": "Acadia National Park",
                "url": "https://www.nps.gov/acad/index.htm",
                "states": "ME",
                "designation": "National Park"
            },
            {"fullName": "No Code Park"},
            {"parkCode": "brca", "fullName": "Bryce Canyon National Park", "url": ""}
        ]
    });
    let empty = json!({"data": []});

    Mock::given(method("GET"))
        .and(path("/parks"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/parks"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let parks = client.parks().await.expect("parks");

    assert_eq!(parks.len(), 2, "item without parkCode is skipped");
    assert_eq!(parks[0].park_code, "acad");
    assert_eq!(
        parks[0].park_url.as_deref(),
        Some("https://www.nps.gov/acad/index.htm")
    );
    assert_eq!(parks[0].states.as_deref(), Some("ME"));
    assert!(parks[1].park_url.is_none(), "empty url becomes None");
}

#[tokio::test]
async fn events_stop_when_a_page_adds_no_new_ids() {
    let server = MockServer::start().await;

    // Every page returns the same two events; the dedup loop must stop on
    // the second page instead of walking offsets forever.
    let page = json!({
        "data": [
            {"id": "ev-1", "title": "Ranger Walk"},
            {"id": "ev-2", "title": "Night Sky Program"}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client.fetch_all(Endpoint::Events).await.expect("fetch_all");

    assert_eq!(items.len(), 2, "duplicate events must be dropped");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parks"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_all(Endpoint::Parks).await;

    let err = result.expect_err("403 must surface as an error");
    assert!(
        err.to_string().contains("403"),
        "expected status in message, got: {err}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tours"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_all(Endpoint::Tours).await;

    let err = result.expect_err("non-JSON body must surface as an error");
    assert!(
        err.to_string().contains("tours"),
        "expected endpoint context in message, got: {err}"
    );
}
