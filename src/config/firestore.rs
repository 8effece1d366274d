// ============================================================================
// Firestore Configuration
// ============================================================================

use crate::error::{DispatchError, DispatchResult};

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";
pub const DEFAULT_USERS_COLLECTION: &str = "users";

/// Where recipient profiles (and their `fcmToken`) live
#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub endpoint: String,
    pub users_collection: String,
}

impl FirestoreConfig {
    pub(crate) fn from_env(fallback_project_id: &str) -> Self {
        Self {
            project_id: std::env::var("FIRESTORE_PROJECT_ID")
                .unwrap_or_else(|_| fallback_project_id.to_string()),
            database: std::env::var("FIRESTORE_DATABASE")
                .unwrap_or_else(|_| DEFAULT_FIRESTORE_DATABASE.to_string()),
            endpoint: std::env::var("FIRESTORE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_FIRESTORE_ENDPOINT.to_string()),
            users_collection: std::env::var("USERS_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_USERS_COLLECTION.to_string()),
        }
    }

    /// REST URL of one user profile document.
    ///
    /// Every path component is pushed as a single percent-encoded segment, so
    /// ids containing `/`, `?`, `#` or `%` address exactly that document.
    pub fn user_document_url(&self, user_id: &str) -> DispatchResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            DispatchError::Config(format!("invalid Firestore endpoint {}: {}", self.endpoint, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                DispatchError::Config(format!(
                    "Firestore endpoint {} cannot be a base URL",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
                "documents",
                self.users_collection.as_str(),
                user_id,
            ]);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> FirestoreConfig {
        FirestoreConfig {
            project_id: "chatsapp".to_string(),
            database: DEFAULT_FIRESTORE_DATABASE.to_string(),
            endpoint: endpoint.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
        }
    }

    #[test]
    fn test_user_document_url() {
        let url = config("http://localhost:8085/").user_document_url("u2").unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8085/v1/projects/chatsapp/databases/(default)/documents/users/u2"
        );
    }

    #[test]
    fn test_user_document_url_escapes_reserved_characters() {
        let url = config("http://localhost:8085")
            .user_document_url("a/b?c#d%e")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8085/v1/projects/chatsapp/databases/(default)/documents/users/a%2Fb%3Fc%23d%25e"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_user_document_url_rejects_bad_endpoint() {
        let err = config("not a url").user_document_url("u2").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
