use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{Document, FIELD_FCM_TOKEN};
use crate::auth::AccessTokenProvider;
use crate::config::FirestoreConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::notification_service::{ProfileStore, RecipientProfile};

/// Reads `users/{uid}` documents through the Firestore REST API
#[derive(Clone)]
pub struct FirestoreProfileStore {
    http_client: reqwest::Client,
    config: FirestoreConfig,
    tokens: AccessTokenProvider,
}

impl FirestoreProfileStore {
    pub fn new(
        config: FirestoreConfig,
        http_client: reqwest::Client,
        tokens: AccessTokenProvider,
    ) -> Self {
        Self {
            http_client,
            config,
            tokens,
        }
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn fetch_profile(&self, user_id: &str) -> DispatchResult<Option<RecipientProfile>> {
        let url = self.config.user_document_url(user_id)?;
        let access_token = self.tokens.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("User profile document does not exist");
                Ok(None)
            }
            status if status.is_success() => {
                let document: Document = response.json().await?;
                Ok(Some(RecipientProfile {
                    user_id: user_id.to_string(),
                    fcm_token: document.string_field(FIELD_FCM_TOKEN).map(str::to_string),
                }))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(DispatchError::ProfileStore(format!(
                    "profile lookup returned {}: {}",
                    status, body
                )))
            }
        }
    }
}
