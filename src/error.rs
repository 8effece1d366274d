use thiserror::Error;

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised by the external collaborators (profile store, FCM, OAuth).
///
/// None of these ever leave `NotificationDispatcher::handle`; they are
/// logged and folded into a `DispatchOutcome` there.
#[derive(Error, Debug)]
pub enum DispatchError {
    // ===== HTTP & Network Errors =====
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Serialization Errors =====
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== Authentication Errors =====
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // ===== Collaborator Errors =====
    #[error("FCM rejected message ({status}): {message}")]
    Fcm { status: u16, message: String },

    #[error("Profile store error: {0}")]
    ProfileStore(String),

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Short, stable label for logs and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::Http(_) => "HTTP_ERROR",
            DispatchError::Json(_) => "JSON_ERROR",
            DispatchError::Auth(_) | DispatchError::Jwt(_) => "AUTH_ERROR",
            DispatchError::Fcm { .. } => "FCM_ERROR",
            DispatchError::ProfileStore(_) => "PROFILE_STORE_ERROR",
            DispatchError::Config(_) => "CONFIG_ERROR",
            DispatchError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether FCM reported the target token as no longer registered
    pub fn is_unregistered_token(&self) -> bool {
        matches!(self, DispatchError::Fcm { status: 404, .. })
            || matches!(self, DispatchError::Fcm { message, .. } if message.contains("UNREGISTERED"))
    }
}
