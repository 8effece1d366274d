// ============================================================================
// Notification Service
// ============================================================================
//
// Message-created event -> push notification for the other participant.
//
// Per event: Received -> Validated -> Resolved -> LookedUp -> Built -> Sent,
// or Dropped at any guard. Nothing is shared between events except the
// injected collaborators, so handlers can run concurrently.
//
// ============================================================================

pub mod dispatcher;
pub mod handlers;
pub mod payload;
pub mod traits;

pub use dispatcher::{DispatchSettings, NotificationDispatcher};
pub use payload::{PayloadBuilder, truncate_body};
pub use traits::{ProfileStore, PushTransport, RecipientProfile};

use serde::Serialize;

/// Why an event ended without a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Trigger body could not be decoded
    InvalidPayload,
    /// Document is not a `chats/{chatId}/messages/{msgId}` message
    UnrecognizedDocumentPath,
    MissingSender,
    MissingText,
    /// Conversation id did not yield a recipient
    MalformedConversationId,
    ProfileNotFound,
    /// Profile exists but has no (or an empty) FCM token
    MissingToken,
    /// Profile store errored; treated like a missing profile
    ProfileLookupFailed,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::InvalidPayload => "invalid_payload",
            DropReason::UnrecognizedDocumentPath => "unrecognized_document_path",
            DropReason::MissingSender => "missing_sender",
            DropReason::MissingText => "missing_text",
            DropReason::MalformedConversationId => "malformed_conversation_id",
            DropReason::ProfileNotFound => "profile_not_found",
            DropReason::MissingToken => "missing_token",
            DropReason::ProfileLookupFailed => "profile_lookup_failed",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one handled event.
///
/// Every variant counts as "handled" towards the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// FCM accepted the message
    Sent { message_id: String },
    /// The transport failed; logged and swallowed
    SendFailed { error: String },
    Dropped { reason: DropReason },
}

impl DispatchOutcome {
    pub fn dropped(reason: DropReason) -> Self {
        DispatchOutcome::Dropped { reason }
    }
}
