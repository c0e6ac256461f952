//! Integration tests for the Shorttags SDK.

use serde_json::json;
use shorttags::{Error, Metrics, Shorttags, TrackResult};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTIFY_PATH: &str = "/api/notify/test-site";

fn client_for(server: &MockServer) -> Shorttags {
    Shorttags::builder("test-key", "test-site")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn metrics(value: serde_json::Value) -> Metrics {
    value.as_object().cloned().unwrap()
}

async fn mount_ok(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(server)
        .await;
}

async fn error_for_status(status: u16, body: &str) -> Error {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_track_sends_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .and(header("Content-Type", "application/json"))
        .and(header("X-API-Key", "test-key"))
        .and(body_json(json!({ "signups": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap();

    assert_eq!(result, TrackResult::Delivered(json!({ "success": true })));
}

#[tokio::test]
async fn test_success_with_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap();

    assert_eq!(result.response(), Some(&json!({ "success": true })));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let err = error_for_status(401, r#"{"error": "Invalid API key"}"#).await;
    assert_eq!(err, Error::Api("Invalid API key".into()));
}

#[tokio::test]
async fn test_site_not_found() {
    let err = error_for_status(404, r#"{"error": "Site not found"}"#).await;
    assert_eq!(err, Error::Api("Site not found".into()));
}

#[tokio::test]
async fn test_validation_error() {
    let err = error_for_status(422, r#"{"error": "metrics must be numeric"}"#).await;
    assert_eq!(
        err,
        Error::Api("Validation error: metrics must be numeric".into())
    );
}

#[tokio::test]
async fn test_rate_limited() {
    let err = error_for_status(429, r#"{"error": "Rate limit exceeded"}"#).await;
    assert_eq!(err, Error::Api("Rate limit exceeded".into()));
}

#[tokio::test]
async fn test_unexpected_status() {
    let err = error_for_status(503, "maintenance").await;
    assert_eq!(err, Error::Api("API returned 503: maintenance".into()));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;
    let other_host = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("Location", format!("{}/collect", other_host.uri()).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&other_host)
        .await;

    let err = client_for(&mock_server)
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap_err();

    assert_eq!(err, Error::Api("API returned 307: ".into()));
    assert!(other_host.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Shorttags::builder("test-key", "test-site")
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap_err();

    assert!(err.is_api());
    assert!(err.message().starts_with("Request timed out"), "{err}");
}

#[tokio::test]
async fn test_connection_failure_is_api_error() {
    // Reserve a free port, then close it so the connection is refused.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = Shorttags::builder("test-key", "test-site")
        .base_url(uri)
        .build()
        .unwrap();

    let err = client
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap_err();

    assert!(err.is_api());
    assert!(err.message().starts_with("Request failed"), "{err}");
}

#[tokio::test]
async fn test_disabled_tracking_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Shorttags::builder("test-key", "test-site")
        .base_url(mock_server.uri())
        .enabled(false)
        .build()
        .unwrap();

    let result = client.signup().send().await.unwrap();
    assert_eq!(
        result,
        TrackResult::Skipped {
            reason: "tracking disabled".into()
        }
    );

    let raw = client.track(metrics(json!({ "orders": 1 }))).await.unwrap();
    assert!(raw.is_skipped());
}

#[tokio::test]
async fn test_non_production_environment_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Shorttags::builder("test-key", "test-site")
        .base_url(mock_server.uri())
        .environment("development")
        .build()
        .unwrap();

    assert!(client.pageview().send().await.unwrap().is_skipped());
}

#[tokio::test]
async fn test_unconfigured_client_fails_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Shorttags::builder("", "")
        .base_url(mock_server.uri())
        .build()
        .unwrap();

    let err = client
        .track(metrics(json!({ "signups": 1 })))
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "Shorttags is not properly configured. Please set api_key and site_id."
    );
}

#[tokio::test]
async fn test_signup_and_login() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, json!({ "signups": 1 })).await;
    mount_ok(&mock_server, json!({ "logins": 1, "attempts": 2 })).await;

    let client = client_for(&mock_server);

    client.signup().property("plan", "pro").send().await.unwrap();
    client
        .login()
        .property("method", "magic_link")
        .property("attempts", 2)
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_payment_and_subscription() {
    let mock_server = MockServer::start().await;
    mount_ok(
        &mock_server,
        json!({ "payments": 1, "revenue": 99.0, "mrr": 99.0, "plan": "pro" }),
    )
    .await;
    mount_ok(
        &mock_server,
        json!({ "subscriptions": 1, "tier_pro": 1, "mrr": 29.0 }),
    )
    .await;

    let client = client_for(&mock_server);

    client
        .payment(99.0)
        .property("mrr", 99.0)
        .property("plan", "pro")
        .send()
        .await
        .unwrap();
    client
        .subscription("pro")
        .property("mrr", 29.0)
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_feature_error_and_custom_event() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, json!({ "feature_export": 1 })).await;
    mount_ok(
        &mock_server,
        json!({ "errors": 1, "error_api": 1, "message": "Rate limit exceeded" }),
    )
    .await;
    mount_ok(&mock_server, json!({ "api_calls": 5 })).await;
    mount_ok(&mock_server, json!({ "file_uploads": 1 })).await;

    let client = client_for(&mock_server);

    client.feature_used("export").send().await.unwrap();
    client
        .error("api")
        .property("message", "Rate limit exceeded")
        .send()
        .await
        .unwrap();
    client.event_with_value("api_calls", 5).send().await.unwrap();
    client.event("file_uploads").send().await.unwrap();
}

#[tokio::test]
async fn test_traffic_events() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server, json!({ "pageviews": 5, "path": "/pricing" })).await;
    mount_ok(&mock_server, json!({ "visitors": 10, "source": "google" })).await;
    mount_ok(&mock_server, json!({ "sessions": 1, "duration": 120 })).await;

    let client = client_for(&mock_server);

    client
        .pageviews(5)
        .property("path", "/pricing")
        .send()
        .await
        .unwrap();
    client
        .visitors(10)
        .property("source", "google")
        .send()
        .await
        .unwrap();
    client.session().property("duration", 120).send().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_sends_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = std::sync::Arc::new(client_for(&mock_server));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.pageview().send().await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert!(!result.is_skipped());
    }
}
