use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delivery class requested from Android
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidPriority {
    /// Power-efficient delivery
    Normal,
    /// Delivered immediately, may wake the device
    High,
}

/// One FCM v1 message, addressed to a single registration token.
///
/// Serializes to the `message` object of `projects.messages.send`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub notification: Notification,
    pub data: BTreeMap<String, String>,
    pub token: String,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidConfig {
    pub priority: AndroidPriority,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidNotification {
    pub channel_id: String,
    pub sound: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

/// The `aps` dictionary. Only background wake-up is requested here; the
/// visible alert comes from the top-level `notification` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aps {
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
}

impl Aps {
    /// `content-available: 1`, no alert
    pub fn background() -> Self {
        Self {
            content_available: Some(1),
        }
    }
}

/// Request body of `messages:send`
#[derive(Debug, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub message: &'a NotificationPayload,
}

/// Successful `messages:send` response
#[derive(Debug, Deserialize)]
pub(crate) struct SendResponse {
    /// `projects/{project}/messages/{message_id}`
    pub name: String,
}
