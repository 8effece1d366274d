// ============================================================================
// Notification Dispatcher
// ============================================================================
//
// Guards, recipient resolution, profile lookup, payload build and send for a
// single message event. `handle` never returns an error: every failure ends
// in a logged drop or a logged send failure, so the event source always sees
// the event as handled and does not retry.
//
// ============================================================================

use tracing::{debug, error, info, warn};

use super::payload::PayloadBuilder;
use super::traits::{ProfileStore, PushTransport};
use super::{DispatchOutcome, DropReason};
use crate::config::Config;
use crate::message::MessageEvent;
use crate::metrics;
use crate::utils::{log_safe_id, token_prefix};

/// Per-process settings for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub payload: PayloadBuilder,
    /// Salt for hashed user ids in log fields
    pub log_hash_salt: String,
}

impl DispatchSettings {
    pub fn new(log_hash_salt: impl Into<String>) -> Self {
        Self {
            payload: PayloadBuilder::default(),
            log_hash_salt: log_hash_salt.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            payload: PayloadBuilder::new(
                config.fcm.android_channel_id.clone(),
                config.body_max_chars,
            ),
            log_hash_salt: config.logging.hash_salt.clone(),
        }
    }
}

/// Stateless dispatcher; safe to share across concurrent events.
pub struct NotificationDispatcher<P, T> {
    profiles: P,
    transport: T,
    settings: DispatchSettings,
}

impl<P, T> NotificationDispatcher<P, T>
where
    P: ProfileStore,
    T: PushTransport,
{
    pub fn new(profiles: P, transport: T, settings: DispatchSettings) -> Self {
        Self {
            profiles,
            transport,
            settings,
        }
    }

    /// Handles one message-created event end to end.
    pub async fn handle(&self, event: &MessageEvent) -> DispatchOutcome {
        let salt = &self.settings.log_hash_salt;
        let conversation_hash = log_safe_id(event.conversation_id.as_str(), salt);

        // 1. Required fields
        let message = match event.validate() {
            Ok(message) => message,
            Err(reason) => return self.drop_event(reason, &conversation_hash),
        };

        // 2. Recipient; an empty id has no profile document to read
        let recipient_id = event
            .conversation_id
            .recipient_for(message.sender_id)
            .filter(|id| !id.is_empty());
        let Some(recipient_id) = recipient_id else {
            return self.drop_event(DropReason::MalformedConversationId, &conversation_hash);
        };
        let recipient_hash = log_safe_id(recipient_id, salt);

        // 3. Recipient's delivery token
        let profile = match self.profiles.fetch_profile(recipient_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return self.drop_event(DropReason::ProfileNotFound, &conversation_hash),
            Err(e) => {
                warn!(
                    error = %e,
                    error_code = e.error_code(),
                    recipient_hash = %recipient_hash,
                    "Profile lookup failed"
                );
                return self.drop_event(DropReason::ProfileLookupFailed, &conversation_hash);
            }
        };
        let Some(token) = profile.delivery_token() else {
            return self.drop_event(DropReason::MissingToken, &conversation_hash);
        };

        // 4. Payload
        let payload = self.settings.payload.build(&message, token);

        // 5. Send, exactly once
        match self.transport.send(&payload).await {
            Ok(message_id) => {
                metrics::NOTIFICATIONS_SENT_TOTAL.inc();
                info!(
                    conversation_hash = %conversation_hash,
                    recipient_hash = %recipient_hash,
                    source_message_id = ?event.message_id,
                    message_id = %message_id,
                    "Sent notification"
                );
                DispatchOutcome::Sent { message_id }
            }
            Err(e) => {
                metrics::NOTIFICATIONS_FAILED_TOTAL.inc();
                error!(
                    error = %e,
                    error_code = e.error_code(),
                    conversation_hash = %conversation_hash,
                    recipient_hash = %recipient_hash,
                    source_message_id = ?event.message_id,
                    token_prefix = %token_prefix(token),
                    "Error sending notification"
                );
                if e.is_unregistered_token() {
                    warn!(
                        recipient_hash = %recipient_hash,
                        "FCM token appears to be unregistered"
                    );
                }
                DispatchOutcome::SendFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn drop_event(&self, reason: DropReason, conversation_hash: &str) -> DispatchOutcome {
        metrics::record_drop(reason);
        debug!(
            conversation_hash = %conversation_hash,
            reason = %reason,
            "Message event dropped"
        );
        DispatchOutcome::dropped(reason)
    }
}
