// ============================================================================
// Notification Service HTTP Surface
// ============================================================================
//
// POST /events/message-created  - Firestore document-created trigger (JSON)
// GET  /health, /health/ready, /health/live
// GET  /metrics
//
// The trigger endpoint answers 200 for every event, including undecodable
// ones, so the event source never retries a notification.
//
// ============================================================================

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use super::traits::{ProfileStore, PushTransport};
use super::{DispatchOutcome, DropReason, NotificationDispatcher};
use crate::firestore::{DocumentEventData, message_event_from_document};
use crate::message::MessageEvent;
use crate::metrics;

pub fn router<P, T>(dispatcher: Arc<NotificationDispatcher<P, T>>) -> Router
where
    P: ProfileStore + 'static,
    T: PushTransport + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_check))
        .route("/health/live", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/events/message-created", post(message_created::<P, T>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(dispatcher)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Document-created trigger for `chats/{chatId}/messages/{msgId}`
async fn message_created<P, T>(
    State(dispatcher): State<Arc<NotificationDispatcher<P, T>>>,
    body: Bytes,
) -> (StatusCode, Json<DispatchOutcome>)
where
    P: ProfileStore + 'static,
    T: PushTransport + 'static,
{
    let outcome = match decode_event(&body) {
        Ok(event) => dispatcher.handle(&event).await,
        Err(reason) => {
            metrics::record_drop(reason);
            DispatchOutcome::dropped(reason)
        }
    };

    (StatusCode::OK, Json(outcome))
}

fn decode_event(body: &[u8]) -> Result<MessageEvent, DropReason> {
    let data: DocumentEventData = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Undecodable document event");
        DropReason::InvalidPayload
    })?;

    let document = data.value.ok_or_else(|| {
        warn!("Document event without a value");
        DropReason::InvalidPayload
    })?;

    message_event_from_document(&document).inspect_err(|_| {
        debug!("Ignoring event for a document outside chats/*/messages");
    })
}
