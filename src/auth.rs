use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::FcmConfig;
use crate::error::{DispatchError, DispatchResult};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scopes needed to send FCM messages and read user profile documents
pub const OAUTH_SCOPES: &str =
    "https://www.googleapis.com/auth/firebase.messaging https://www.googleapis.com/auth/datastore";

/// Lifetime requested for service-account assertions
const ASSERTION_TTL_SECS: i64 = 3600;

/// Cached tokens are refreshed this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a Google service-account key file that are needed here
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Clone)]
enum TokenSource {
    Static(String),
    ServiceAccount(ServiceAccountKey),
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("Static(..)"),
            TokenSource::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
        }
    }
}

/// Supplies OAuth bearer tokens for the Google APIs used by the dispatcher.
///
/// Cheap to clone; clones share the token cache.
#[derive(Debug, Clone)]
pub struct AccessTokenProvider {
    source: TokenSource,
    http_client: reqwest::Client,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl AccessTokenProvider {
    /// Always hands out the same pre-issued token
    pub fn static_token(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
            http_client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn service_account(key: ServiceAccountKey, http_client: reqwest::Client) -> Self {
        Self {
            source: TokenSource::ServiceAccount(key),
            http_client,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Static token wins over the service account when both are configured
    pub fn from_config(config: &FcmConfig, http_client: reqwest::Client) -> DispatchResult<Self> {
        if let Some(token) = &config.static_access_token {
            tracing::info!("Using static FCM access token");
            return Ok(Self::static_token(token.clone()));
        }

        let path = config.credentials_path.as_deref().ok_or_else(|| {
            DispatchError::Config("no FCM credentials configured".to_string())
        })?;
        let raw = std::fs::read_to_string(path)?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)?;

        tracing::info!(
            client_email = %key.client_email,
            "Using service-account credentials for Google APIs"
        );

        Ok(Self::service_account(key, http_client))
    }

    /// Returns a valid bearer token, exchanging a new assertion if needed
    pub async fn access_token(&self) -> DispatchResult<String> {
        let key = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount(key) => key,
        };

        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let mut guard = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.exchange_assertion(key).await?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    async fn exchange_assertion(&self, key: &ServiceAccountKey) -> DispatchResult<CachedToken> {
        let now = Utc::now();
        let assertion = sign_assertion(key, now)?;

        tracing::debug!(token_uri = %key.token_uri, "Exchanging service-account assertion");

        let response = self
            .http_client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, "OAuth token exchange failed");
            return Err(DispatchError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

/// RS256 JWT assertion for the OAuth jwt-bearer grant
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> DispatchResult<String> {
    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: OAUTH_SCOPES,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_TTL_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
}
