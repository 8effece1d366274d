// ============================================================================
// FCM Configuration
// ============================================================================

use anyhow::{Context, Result};

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";
pub const DEFAULT_ANDROID_CHANNEL_ID: &str = "chatsapp_messages";

/// Firebase Cloud Messaging (HTTP v1) configuration
#[derive(Clone, Debug)]
pub struct FcmConfig {
    /// Firebase project that owns the app registrations
    pub project_id: String,
    /// Base URL of the FCM API (overridable for emulators/tests)
    pub endpoint: String,
    /// Android notification channel the client app registers
    pub android_channel_id: String,
    /// Path to a service-account JSON key (GOOGLE_APPLICATION_CREDENTIALS)
    pub credentials_path: Option<String>,
    /// Pre-issued bearer token, used instead of the service account when set
    pub static_access_token: Option<String>,
}

impl FcmConfig {
    pub(crate) fn from_env() -> Result<Self> {
        let project_id = std::env::var("FCM_PROJECT_ID").context("FCM_PROJECT_ID must be set")?;
        if project_id.trim().is_empty() {
            anyhow::bail!("FCM_PROJECT_ID must not be empty");
        }

        let credentials_path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
            .ok()
            .filter(|p| !p.is_empty());
        let static_access_token = std::env::var("FCM_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        if credentials_path.is_none() && static_access_token.is_none() {
            anyhow::bail!(
                "Either GOOGLE_APPLICATION_CREDENTIALS or FCM_ACCESS_TOKEN must be set to authenticate with FCM"
            );
        }

        Ok(Self {
            project_id,
            endpoint: std::env::var("FCM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_FCM_ENDPOINT.to_string()),
            android_channel_id: std::env::var("FCM_ANDROID_CHANNEL_ID")
                .unwrap_or_else(|_| DEFAULT_ANDROID_CHANNEL_ID.to_string()),
            credentials_path,
            static_access_token,
        })
    }

    /// `messages:send` URL for this project
    pub fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }
}
