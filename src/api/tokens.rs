//! Session tokens and where they are kept
//!
//! The API issues a short-lived access token and a refresh token. Both are
//! wiped from memory when dropped.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::BudgetwisePaths;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::storage::{read_json_optional, remove_if_exists, write_json_atomic};

/// Access/refresh token pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

impl AuthTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Expiry of the access token, read from the JWT `exp` claim
    ///
    /// Returns `None` for tokens that are not JWTs or carry no `exp`.
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.access.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    /// True only when the token says it has expired
    pub fn access_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_expires_at().is_some_and(|exp| exp <= now)
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Persistence for the current token pair
pub trait TokenStore: Send + Sync {
    fn load(&self) -> BudgetwiseResult<Option<AuthTokens>>;
    fn save(&self, tokens: &AuthTokens) -> BudgetwiseResult<()>;
    fn clear(&self) -> BudgetwiseResult<()>;
}

/// Tokens kept in `data/tokens.json`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(paths: &BudgetwisePaths) -> Self {
        Self {
            path: paths.tokens_file(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> BudgetwiseResult<Option<AuthTokens>> {
        read_json_optional(&self.path)
    }

    fn save(&self, tokens: &AuthTokens) -> BudgetwiseResult<()> {
        write_json_atomic(&self.path, tokens)
    }

    fn clear(&self) -> BudgetwiseResult<()> {
        remove_if_exists(&self.path)
    }
}

/// Tokens held in memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> BudgetwiseResult<Option<AuthTokens>> {
        let guard = self
            .tokens
            .lock()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire token lock: {}", e)))?;
        Ok(guard.clone())
    }

    fn save(&self, tokens: &AuthTokens) -> BudgetwiseResult<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire token lock: {}", e)))?;
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> BudgetwiseResult<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire token lock: {}", e)))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{}}}"#, exp));
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_access_expiry_from_jwt() {
        let tokens = AuthTokens::new(jwt_with_exp(1_760_000_000), "refresh");
        let expected = Utc.timestamp_opt(1_760_000_000, 0).unwrap();
        assert_eq!(tokens.access_expires_at(), Some(expected));
        assert!(tokens.access_expired(expected));
        assert!(!tokens.access_expired(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        let tokens = AuthTokens::new("not-a-jwt", "refresh");
        assert_eq!(tokens.access_expires_at(), None);
        assert!(!tokens.access_expired(Utc::now()));
    }

    #[test]
    fn test_debug_redacts() {
        let tokens = AuthTokens::new("abc", "def");
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("abc"));
        assert!(!debug.contains("def"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = FileTokenStore::new(&paths);

        assert!(store.load().unwrap().is_none());
        store.save(&AuthTokens::new("a1", "r1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(AuthTokens::new("a1", "r1")));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!paths.tokens_file().exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        store.save(&AuthTokens::new("a", "r")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access, "a");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
