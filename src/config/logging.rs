// ============================================================================
// Logging Configuration
// ============================================================================

/// Placeholder salt shipped in sample env files; refused at startup.
const PLACEHOLDER_HASH_SALT: &str = "default-salt-please-change";

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Salt for `utils::log_safe_id`, so user ids never hit the logs raw
    pub hash_salt: String,
}

impl LoggingConfig {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let salt = std::env::var("LOG_HASH_SALT")
            .unwrap_or_else(|_| PLACEHOLDER_HASH_SALT.to_string());
        Self::with_salt(salt)
    }

    pub(crate) fn with_salt(hash_salt: String) -> anyhow::Result<Self> {
        if hash_salt.is_empty() || hash_salt == PLACEHOLDER_HASH_SALT {
            anyhow::bail!("LOG_HASH_SALT must be set to a unique, secret value");
        }
        Ok(Self { hash_salt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_salt_rejected() {
        assert!(LoggingConfig::with_salt(String::new()).is_err());
        assert!(LoggingConfig::with_salt(PLACEHOLDER_HASH_SALT.to_string()).is_err());
        assert!(LoggingConfig::with_salt("s3cr3t".to_string()).is_ok());
    }
}
