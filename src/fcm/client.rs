use async_trait::async_trait;
use tracing::debug;

use super::types::{NotificationPayload, SendRequest, SendResponse};
use crate::auth::AccessTokenProvider;
use crate::config::FcmConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::notification_service::PushTransport;
use crate::utils::token_prefix;

/// FCM HTTP v1 client
#[derive(Clone)]
pub struct FcmClient {
    http_client: reqwest::Client,
    send_url: String,
    tokens: AccessTokenProvider,
}

impl FcmClient {
    pub fn new(config: &FcmConfig, http_client: reqwest::Client, tokens: AccessTokenProvider) -> Self {
        Self {
            http_client,
            send_url: config.send_url(),
            tokens,
        }
    }

    /// Send a single message; returns FCM's message name on success
    pub async fn send_message(&self, payload: &NotificationPayload) -> DispatchResult<String> {
        let access_token = self.tokens.access_token().await?;

        debug!(
            token_prefix = %token_prefix(&payload.token),
            "Sending FCM message"
        );

        let response = self
            .http_client
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&SendRequest { message: payload })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let sent: SendResponse = response.json().await?;
            debug!(message_name = %sent.name, "FCM message accepted");
            return Ok(sent.name);
        }

        let body = response.text().await.unwrap_or_default();
        let message = describe_fcm_error(&body);
        debug!(status = %status, fcm_error = %message, "FCM rejected message");

        Err(DispatchError::Fcm {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PushTransport for FcmClient {
    async fn send(&self, payload: &NotificationPayload) -> DispatchResult<String> {
        self.send_message(payload).await
    }
}

/// Condenses a Google API error body into "STATUS: message [ERROR_CODE]".
///
/// Falls back to the raw body if it is not the usual error envelope.
fn describe_fcm_error(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    let Some(error) = value.get("error") else {
        return body.to_string();
    };

    let status = error.get("status").and_then(|s| s.as_str()).unwrap_or("UNKNOWN");
    let message = error.get("message").and_then(|m| m.as_str()).unwrap_or("");
    let fcm_code = error
        .get("details")
        .and_then(|d| d.as_array())
        .and_then(|details| {
            details
                .iter()
                .find_map(|detail| detail.get("errorCode").and_then(|c| c.as_str()))
        });

    match fcm_code {
        Some(code) => format!("{}: {} [{}]", status, message, code),
        None => format!("{}: {}", status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_fcm_error_with_details() {
        let body = r#"{
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND",
                "details": [{
                    "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                    "errorCode": "UNREGISTERED"
                }]
            }
        }"#;

        assert_eq!(
            describe_fcm_error(body),
            "NOT_FOUND: Requested entity was not found. [UNREGISTERED]"
        );
    }

    #[test]
    fn test_describe_fcm_error_without_details() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#;
        assert_eq!(
            describe_fcm_error(body),
            "UNAUTHENTICATED: Request had invalid authentication credentials."
        );
    }

    #[test]
    fn test_describe_fcm_error_non_json() {
        assert_eq!(describe_fcm_error("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_send_url() {
        let config = FcmConfig {
            project_id: "chatsapp".to_string(),
            endpoint: "https://fcm.googleapis.com/".to_string(),
            android_channel_id: "chatsapp_messages".to_string(),
            credentials_path: None,
            static_access_token: Some("t".to_string()),
        };
        let client = FcmClient::new(
            &config,
            reqwest::Client::new(),
            AccessTokenProvider::static_token("t"),
        );

        assert_eq!(
            client.send_url,
            "https://fcm.googleapis.com/v1/projects/chatsapp/messages:send"
        );
    }
}
