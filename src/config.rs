use anyhow::Result;

mod fcm;
mod firestore;
mod logging;

pub use fcm::{DEFAULT_ANDROID_CHANNEL_ID, DEFAULT_FCM_ENDPOINT, FcmConfig};
pub use firestore::{
    DEFAULT_FIRESTORE_DATABASE, DEFAULT_FIRESTORE_ENDPOINT, DEFAULT_USERS_COLLECTION,
    FirestoreConfig,
};
pub use logging::LoggingConfig;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8080;

/// Notification bodies are cut to this many characters before "..." is added
pub const DEFAULT_BODY_MAX_CHARS: usize = 100;

// ============================================================================
// Configuration Structures
// ============================================================================

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub rust_log: String,
    pub body_max_chars: usize,

    // Sub-configurations
    pub logging: LoggingConfig,
    pub fcm: FcmConfig,
    pub firestore: FirestoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let fcm = FcmConfig::from_env()?;
        let firestore = FirestoreConfig::from_env(&fcm.project_id);

        let body_max_chars = std::env::var("NOTIFICATION_BODY_MAX_CHARS")
            .ok()
            .and_then(|n| n.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_BODY_MAX_CHARS);

        Ok(Self {
            port,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| format!("0.0.0.0:{}", port)),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            body_max_chars,
            logging: LoggingConfig::from_env()?,
            fcm,
            firestore,
        })
    }
}
