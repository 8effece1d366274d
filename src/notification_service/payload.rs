use std::collections::BTreeMap;

use crate::config::{DEFAULT_ANDROID_CHANNEL_ID, DEFAULT_BODY_MAX_CHARS};
use crate::fcm::types::{
    AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps,
    Notification, NotificationPayload,
};
use crate::message::ValidatedMessage;

/// Data keys read by the mobile client
pub const DATA_KEY_CHAT_ID: &str = "chatId";
pub const DATA_KEY_SENDER_NAME: &str = "senderName";

const ELLIPSIS: &str = "...";
const DEFAULT_SOUND: &str = "default";

/// Cuts `text` to `max_chars` characters, appending "..." if anything was cut.
///
/// Counts `char`s, not bytes or graphemes, and ignores word boundaries.
pub fn truncate_body(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Builds FCM payloads. Pure; holds only formatting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBuilder {
    pub android_channel_id: String,
    pub body_max_chars: usize,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            android_channel_id: DEFAULT_ANDROID_CHANNEL_ID.to_string(),
            body_max_chars: DEFAULT_BODY_MAX_CHARS,
        }
    }
}

impl PayloadBuilder {
    pub fn new(android_channel_id: impl Into<String>, body_max_chars: usize) -> Self {
        Self {
            android_channel_id: android_channel_id.into(),
            body_max_chars,
        }
    }

    /// Android gets a high-priority alert on the chat channel; iOS gets a
    /// background wake-up and renders the alert from `notification` itself.
    pub fn build(&self, message: &ValidatedMessage<'_>, recipient_token: &str) -> NotificationPayload {
        let title = message.sender_name.to_string();

        let mut data = BTreeMap::new();
        data.insert(
            DATA_KEY_CHAT_ID.to_string(),
            message.conversation_id.as_str().to_string(),
        );
        data.insert(DATA_KEY_SENDER_NAME.to_string(), title.clone());

        NotificationPayload {
            notification: Notification {
                title,
                body: truncate_body(message.text, self.body_max_chars),
            },
            data,
            token: recipient_token.to_string(),
            android: AndroidConfig {
                priority: AndroidPriority::High,
                notification: AndroidNotification {
                    channel_id: self.android_channel_id.clone(),
                    sound: DEFAULT_SOUND.to_string(),
                },
            },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps::background(),
                },
            },
        }
    }
}
