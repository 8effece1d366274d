use sha2::{Digest, Sha256};

/// Number of device token characters that may appear in logs.
const TOKEN_LOG_PREFIX_LEN: usize = 8;

/// Salted, truncated hash of a user identifier for log fields.
///
/// Recipient and sender ids never reach the logs in clear text; the same id
/// always maps to the same 8 hex chars for a given salt, so a single user's
/// events can still be correlated.
pub fn log_safe_id(id: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(id.as_bytes());
    let hash = hasher.finalize();

    hash[..4]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

/// First few characters of a device token, for diagnostics.
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(TOKEN_LOG_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_id_is_stable_per_salt() {
        let a = log_safe_id("u1", "salt-a");
        let b = log_safe_id("u1", "salt-a");
        let c = log_safe_id("u1", "salt-b");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 8);
        assert!(!a.contains("u1"));
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("abcdefghijkl"), "abcdefgh");
        assert_eq!(token_prefix("short"), "short");
        assert_eq!(token_prefix(""), "");
    }
}
