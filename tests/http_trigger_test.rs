// ============================================================================
// HTTP Trigger Tests
// ============================================================================
//
// Drives the axum router directly (no socket):
// - POST /events/message-created with Firestore document events
// - health and metrics endpoints
//
// Every trigger request must answer 200, whatever happened to the event.
//
// ============================================================================

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chat_push_dispatcher::notification_service::handlers::router;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use test_utils::{InMemoryProfileStore, RecordingTransport, dispatcher};

fn created_event(name: &str, fields: Value) -> String {
    json!({ "value": { "name": name, "fields": fields } }).to_string()
}

async fn post_event(app: axum::Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events/message-created")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_message_created_sends_notification() {
    let profiles = Arc::new(InMemoryProfileStore::new().with_token("u2", "TOK"));
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let body = created_event(
        "projects/chatsapp/databases/(default)/documents/chats/u1_u2/messages/m1",
        json!({
            "senderId": { "stringValue": "u1" },
            "senderName": { "stringValue": "Alice" },
            "text": { "stringValue": "hi" }
        }),
    );
    let (status, outcome) = post_event(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "sent");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].notification.title, "Alice");
    assert_eq!(sent[0].token, "TOK");
}

#[tokio::test]
async fn test_message_without_text_is_dropped_with_ok() {
    let profiles = Arc::new(InMemoryProfileStore::new().with_token("u2", "TOK"));
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let body = created_event(
        "chats/u1_u2/messages/m1",
        json!({ "senderId": { "stringValue": "u1" } }),
    );
    let (status, outcome) = post_event(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "outcome": "dropped", "reason": "missing_text" }));
    assert!(profiles.lookups().is_empty());
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_still_answers_ok() {
    let profiles = Arc::new(InMemoryProfileStore::new().with_token("u2", "TOK"));
    let transport = Arc::new(RecordingTransport::failing());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let body = created_event(
        "chats/u1_u2/messages/m1",
        json!({
            "senderId": { "stringValue": "u1" },
            "text": { "stringValue": "hi" }
        }),
    );
    let (status, outcome) = post_event(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "send_failed");
}

#[tokio::test]
async fn test_undecodable_body_is_dropped_with_ok() {
    let profiles = Arc::new(InMemoryProfileStore::new());
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let (status, outcome) = post_event(app, "not json".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "outcome": "dropped", "reason": "invalid_payload" }));
}

#[tokio::test]
async fn test_event_without_value_is_dropped_with_ok() {
    let profiles = Arc::new(InMemoryProfileStore::new());
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let (status, outcome) = post_event(app, json!({ "oldValue": {} }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["reason"], "invalid_payload");
}

#[tokio::test]
async fn test_other_document_is_dropped_with_ok() {
    let profiles = Arc::new(InMemoryProfileStore::new().with_token("u2", "TOK"));
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let body = created_event(
        "users/u2",
        json!({ "fcmToken": { "stringValue": "TOK" } }),
    );
    let (status, outcome) = post_event(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["reason"], "unrecognized_document_path");
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let profiles = Arc::new(InMemoryProfileStore::new());
    let transport = Arc::new(RecordingTransport::new());
    let app = router(Arc::new(dispatcher(&profiles, &transport)));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
