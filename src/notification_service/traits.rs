// ============================================================================
// Collaborator Traits
// ============================================================================
//
// The dispatcher only talks to the outside world through these two traits.
// Production wires in Firestore and FCM; tests substitute in-memory fakes.
//
// ============================================================================

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::DispatchResult;
use crate::fcm::NotificationPayload;

/// What the dispatcher needs to know about a recipient
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipientProfile {
    pub user_id: String,
    pub fcm_token: Option<String>,
}

impl RecipientProfile {
    /// The token, if one is stored and non-empty
    pub fn delivery_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Point lookup of user profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no profile exists for `user_id`
    async fn fetch_profile(&self, user_id: &str) -> DispatchResult<Option<RecipientProfile>>;
}

/// Push delivery channel
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Delivers one message; returns the transport's opaque message id
    async fn send(&self, payload: &NotificationPayload) -> DispatchResult<String>;
}

#[async_trait]
impl<S: ProfileStore + ?Sized> ProfileStore for Arc<S> {
    async fn fetch_profile(&self, user_id: &str) -> DispatchResult<Option<RecipientProfile>> {
        (**self).fetch_profile(user_id).await
    }
}

#[async_trait]
impl<T: PushTransport + ?Sized> PushTransport for Arc<T> {
    async fn send(&self, payload: &NotificationPayload) -> DispatchResult<String> {
        (**self).send(payload).await
    }
}
