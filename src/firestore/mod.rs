// ============================================================================
// Firestore Documents
// ============================================================================
//
// Minimal model of Firestore's REST/JSON document encoding, shared by the
// trigger intake (document-created events) and the profile lookup.
//
// ============================================================================

pub mod profile_store;

pub use profile_store::FirestoreProfileStore;

use serde::Deserialize;
use std::collections::HashMap;

use crate::message::{ConversationId, MessageEvent};
use crate::notification_service::DropReason;

/// Field names of a chat message document
pub const FIELD_SENDER_ID: &str = "senderId";
pub const FIELD_SENDER_NAME: &str = "senderName";
pub const FIELD_TEXT: &str = "text";

/// Field of a user document holding the FCM registration token
pub const FIELD_FCM_TOKEN: &str = "fcmToken";

/// A Firestore document in REST/JSON form.
///
/// Field values keep Firestore's typed encoding (`{"stringValue": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Value of a string field; `None` if absent, null or of another type.
    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|value| value.get("stringValue"))
            .and_then(|value| value.as_str())
    }
}

/// Body of a `document.v1.created` event delivered as JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    #[serde(default)]
    pub value: Option<Document>,
}

/// Ids embedded in a `chats/{chatId}/messages/{msgId}` document path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePath<'a> {
    pub chat_id: &'a str,
    pub message_id: &'a str,
}

/// Parses a message document path.
///
/// Accepts the fully qualified resource name
/// (`projects/p/databases/d/documents/chats/..`) as well as the relative form.
pub fn parse_message_path(name: &str) -> Option<MessagePath<'_>> {
    let relative = match name.find("/documents/") {
        Some(idx) => &name[idx + "/documents/".len()..],
        None => name.strip_prefix("documents/").unwrap_or(name),
    };

    let segments: Vec<&str> = relative.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        &["chats", chat_id, "messages", message_id]
            if !chat_id.is_empty() && !message_id.is_empty() =>
        {
            Some(MessagePath {
                chat_id,
                message_id,
            })
        }
        _ => None,
    }
}

/// Event Intake: turns a created message document into a [`MessageEvent`].
///
/// Only the document path is checked here; missing message fields are kept
/// as `None` and judged later by the dispatch guards.
pub fn message_event_from_document(document: &Document) -> Result<MessageEvent, DropReason> {
    let path = parse_message_path(&document.name).ok_or(DropReason::UnrecognizedDocumentPath)?;

    Ok(MessageEvent {
        conversation_id: ConversationId::new(path.chat_id),
        message_id: Some(path.message_id.to_string()),
        sender_id: document.string_field(FIELD_SENDER_ID).map(str::to_string),
        sender_name: document.string_field(FIELD_SENDER_NAME).map(str::to_string),
        text: document.string_field(FIELD_TEXT).map(str::to_string),
    })
}
