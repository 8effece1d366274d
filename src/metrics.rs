//! Prometheus metrics for the push dispatcher
//!
//! One counter per terminal dispatch state; drops are labelled by reason.

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, IntCounter, IntCounterVec, TextEncoder, opts, register_int_counter,
    register_int_counter_vec,
};

use crate::notification_service::DropReason;

/// Notifications accepted by FCM
pub static NOTIFICATIONS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "chat_push_notifications_sent_total",
        "Notifications accepted by the push transport"
    ))
    .expect("Failed to register NOTIFICATIONS_SENT_TOTAL metric")
});

/// Send attempts that failed in the transport
pub static NOTIFICATIONS_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "chat_push_notifications_failed_total",
        "Notification sends that failed in the push transport"
    ))
    .expect("Failed to register NOTIFICATIONS_FAILED_TOTAL metric")
});

/// Events dropped before a send attempt, by reason
pub static NOTIFICATIONS_DROPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "chat_push_notifications_dropped_total",
            "Message events dropped without a send attempt"
        ),
        &["reason"]
    )
    .expect("Failed to register NOTIFICATIONS_DROPPED_TOTAL metric")
});

pub fn record_drop(reason: DropReason) {
    NOTIFICATIONS_DROPPED_TOTAL
        .with_label_values(&[reason.as_str()])
        .inc();
}

/// Gather all registered metrics and encode as Prometheus text format
pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
