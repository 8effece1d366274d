// ============================================================================
// Message Events
// ============================================================================
//
// Typed form of a "message created" event. Built once at intake from the
// Firestore document and passed by reference through the rest of the
// dispatch pipeline.
//
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::notification_service::DropReason;

/// Separator between the two participant ids of a conversation id
pub const CONVERSATION_ID_SEPARATOR: char = '_';

/// Title used when the sender did not attach a display name
pub const DEFAULT_SENDER_NAME: &str = "Someone";

/// Two-party conversation key, e.g. `"u1_u2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// See [`resolve_recipient`].
    pub fn recipient_for(&self, sender_id: &str) -> Option<&str> {
        resolve_recipient(self.as_str(), sender_id)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the other participant of a two-party conversation.
///
/// Returns `None` when the id has fewer than two tokens. When the sender is
/// the first participant the second one is returned; in every other case,
/// including a sender that matches neither token, the first one is.
/// Extra tokens are ignored. The returned id may be empty (`"_B"`).
pub fn resolve_recipient<'a>(conversation_id: &'a str, sender_id: &str) -> Option<&'a str> {
    let mut parts = conversation_id.split(CONVERSATION_ID_SEPARATOR);
    let (first, second) = (parts.next()?, parts.next()?);

    Some(if sender_id == first { second } else { first })
}

/// One newly created chat message, as received from the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub conversation_id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A [`MessageEvent`] whose required fields are present and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMessage<'a> {
    pub conversation_id: &'a ConversationId,
    pub sender_id: &'a str,
    pub sender_name: &'a str,
    pub text: &'a str,
}

impl MessageEvent {
    /// Display name with the "Someone" fallback applied
    pub fn sender_display_name(&self) -> &str {
        self.sender_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SENDER_NAME)
    }

    /// Checks sender, then text. The first missing field is reported.
    pub fn validate(&self) -> Result<ValidatedMessage<'_>, DropReason> {
        let sender_id = non_empty(self.sender_id.as_deref()).ok_or(DropReason::MissingSender)?;
        let text = non_empty(self.text.as_deref()).ok_or(DropReason::MissingText)?;

        Ok(ValidatedMessage {
            conversation_id: &self.conversation_id,
            sender_id,
            sender_name: self.sender_display_name(),
            text,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sender_id: Option<&str>, sender_name: Option<&str>, text: Option<&str>) -> MessageEvent {
        MessageEvent {
            conversation_id: ConversationId::new("u1_u2"),
            message_id: None,
            sender_id: sender_id.map(str::to_string),
            sender_name: sender_name.map(str::to_string),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_recipient_both_directions() {
        assert_eq!(resolve_recipient("A_B", "A"), Some("B"));
        assert_eq!(resolve_recipient("A_B", "B"), Some("A"));
    }

    #[test]
    fn test_resolve_recipient_malformed() {
        assert_eq!(resolve_recipient("AB", "A"), None);
        assert_eq!(resolve_recipient("", "A"), None);
    }

    #[test]
    fn test_resolve_recipient_third_party_falls_back_to_first() {
        assert_eq!(resolve_recipient("A_B", "C"), Some("A"));
    }

    #[test]
    fn test_resolve_recipient_ignores_extra_tokens() {
        assert_eq!(resolve_recipient("A_B_C", "A"), Some("B"));
        assert_eq!(resolve_recipient("A_B_C", "B"), Some("A"));
    }

    #[test]
    fn test_resolve_recipient_empty_token() {
        assert_eq!(resolve_recipient("_B", "B"), Some(""));
        assert_eq!(resolve_recipient("A_", "A"), Some(""));
        assert_eq!(resolve_recipient("_B", "X"), Some(""));
    }

    #[test]
    fn test_recipient_for() {
        let id = ConversationId::new("u1_u2");
        assert_eq!(id.recipient_for("u2"), Some("u1"));
        assert_eq!(ConversationId::new("solo").recipient_for("solo"), None);
    }

    #[test]
    fn test_sender_display_name_fallback() {
        assert_eq!(event(Some("u1"), Some("Alice"), Some("hi")).sender_display_name(), "Alice");
        assert_eq!(event(Some("u1"), None, Some("hi")).sender_display_name(), "Someone");
        assert_eq!(event(Some("u1"), Some(""), Some("hi")).sender_display_name(), "Someone");
    }

    #[test]
    fn test_validate() {
        let valid = event(Some("u1"), None, Some("hi"));
        let validated = valid.validate().unwrap();
        assert_eq!(validated.sender_id, "u1");
        assert_eq!(validated.sender_name, "Someone");
        assert_eq!(validated.text, "hi");

        assert_eq!(
            event(None, None, Some("hi")).validate(),
            Err(DropReason::MissingSender)
        );
        assert_eq!(
            event(Some(""), None, Some("hi")).validate(),
            Err(DropReason::MissingSender)
        );
        assert_eq!(
            event(Some("u1"), None, Some("")).validate(),
            Err(DropReason::MissingText)
        );
        assert_eq!(
            event(Some("u1"), None, None).validate(),
            Err(DropReason::MissingText)
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"conversationId":"u1_u2","senderId":"u1","text":"hi"}"#;
        let parsed: MessageEvent = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.conversation_id.as_str(), "u1_u2");
        assert_eq!(parsed.sender_id.as_deref(), Some("u1"));
        assert_eq!(parsed.sender_name, None);
        assert_eq!(parsed.text.as_deref(), Some("hi"));
    }
}
