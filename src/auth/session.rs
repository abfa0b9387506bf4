//! Token-based session lifecycle.
//!
//! A session is created from a successful login, rotated in place by silent
//! refresh, and destroyed on sign-out or on the first 401 from the backend.
//! The record is persisted to `session.json` in the config directory so a
//! restart does not force a re-login while the refresh token is still good.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiError;

use super::token::derive_expiry;

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

/// Seconds of remaining lifetime below which the access token is refreshed.
/// Absorbs clock skew and in-flight request latency.
const REFRESH_MARGIN_SECS: i64 = 10;

/// Terminal session failures. Either one marks the session unusable: the
/// holder must be treated as unauthenticated and sent back to login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    /// The session has no refresh token to mint a new access token with.
    NoRefreshToken,
    /// The refresh call failed; one kind covers every cause (rejected
    /// token, network failure, malformed response).
    RefreshAccessTokenError,
}

/// New token pair returned by the refresh endpoint.
#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub role: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
}

impl SessionData {
    /// Build a session from the login response fields. Expiry comes from the
    /// access token's own `exp` claim.
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        user_id: String,
        role: String,
        email: String,
        name: String,
    ) -> Self {
        let expires_at = derive_expiry(&access_token);
        Self {
            access_token,
            refresh_token,
            expires_at,
            user_id,
            role,
            email,
            name,
            error: None,
        }
    }

    /// Whether the access token can be reused as-is at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now > Duration::seconds(REFRESH_MARGIN_SECS)
    }

    /// A session carrying a terminal error must never attach credentials.
    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }

    /// Refresh the token pair if the access token is at or past the margin.
    ///
    /// `refresh` is only invoked when a refresh token is present and the
    /// session is stale; it receives the refresh token and returns the new
    /// pair. Failures never propagate: they land in `self.error` and the
    /// caller reacts by forcing re-authentication.
    pub async fn ensure_fresh<F, Fut>(&mut self, refresh: F)
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<RefreshedTokens, ApiError>>,
    {
        if self.is_fresh(Utc::now()) {
            return;
        }

        let Some(refresh_token) = self.refresh_token.clone().filter(|t| !t.is_empty()) else {
            self.error = Some(SessionError::NoRefreshToken);
            return;
        };

        let outcome = refresh(refresh_token).await;
        self.apply_refresh(outcome);
    }

    /// Fold a refresh outcome into the session: rotate all three token
    /// fields on success, set the terminal flag on failure. Old tokens are
    /// left untouched on failure so the state remains inspectable.
    pub fn apply_refresh(&mut self, outcome: std::result::Result<RefreshedTokens, ApiError>) {
        match outcome {
            Ok(tokens) => {
                self.expires_at = derive_expiry(&tokens.access_token);
                self.access_token = tokens.access_token;
                self.refresh_token = Some(tokens.refresh_token);
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                self.error = Some(SessionError::RefreshAccessTokenError);
            }
        }
    }
}

/// On-disk session store.
pub struct Session {
    config_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data: None,
        }
    }

    /// Load a persisted session from disk. Returns whether one was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save the current session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data, in memory and on disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if the session is usable
    pub fn token(&self) -> Option<&str> {
        self.data
            .as_ref()
            .filter(|d| d.is_usable())
            .map(|d| d.access_token.as_str())
    }

    /// Coarse presence test used by the navigation guard: a session record
    /// exists and carries no terminal error.
    pub fn is_authenticated(&self) -> bool {
        self.data.as_ref().map(|d| d.is_usable()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn session_expiring_in(secs: i64) -> SessionData {
        let mut data = SessionData::new(
            "opaque-access".to_string(),
            Some("opaque-refresh".to_string()),
            "64f0c1".to_string(),
            "admin".to_string(),
            "admin@example.com".to_string(),
            "Admin".to_string(),
        );
        data.expires_at = Utc::now() + Duration::seconds(secs);
        data
    }

    #[test]
    fn test_freshness_margin() {
        let now = Utc::now();
        let mut data = session_expiring_in(0);

        data.expires_at = now + Duration::seconds(60);
        assert!(data.is_fresh(now));

        data.expires_at = now + Duration::seconds(10);
        assert!(!data.is_fresh(now), "exactly at the margin counts as stale");

        data.expires_at = now - Duration::seconds(5);
        assert!(!data.is_fresh(now));
    }

    #[tokio::test]
    async fn test_fresh_session_skips_refresh() {
        let mut data = session_expiring_in(300);
        let calls = Cell::new(0u32);

        data.ensure_fresh(|_rt| {
            calls.set(calls.get() + 1);
            async {
                Ok(RefreshedTokens {
                    access_token: "unused".to_string(),
                    refresh_token: "unused".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls.get(), 0);
        assert_eq!(data.access_token, "opaque-access");
        assert!(data.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_session_refreshes_once_and_rotates() {
        let mut data = session_expiring_in(5);
        let calls = Cell::new(0u32);

        data.ensure_fresh(|rt| {
            calls.set(calls.get() + 1);
            assert_eq!(rt, "opaque-refresh");
            async {
                Ok(RefreshedTokens {
                    access_token: "new-access".to_string(),
                    refresh_token: "new-refresh".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert_eq!(data.access_token, "new-access");
        assert_eq!(data.refresh_token.as_deref(), Some("new-refresh"));
        // "new-access" has no decodable payload, so expiry falls back to ~1h
        assert!(data.expires_at > Utc::now() + Duration::seconds(3000));
        assert!(data.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_is_terminal_without_a_call() {
        let mut data = session_expiring_in(-60);
        data.refresh_token = None;
        let calls = Cell::new(0u32);

        data.ensure_fresh(|_rt| {
            calls.set(calls.get() + 1);
            async {
                Ok(RefreshedTokens {
                    access_token: "unused".to_string(),
                    refresh_token: "unused".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls.get(), 0);
        assert_eq!(data.error, Some(SessionError::NoRefreshToken));
        assert!(!data.is_usable());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_old_tokens() {
        let mut data = session_expiring_in(-60);
        let old_expiry = data.expires_at;

        data.ensure_fresh(|_rt| async {
            Err(ApiError::InvalidResponse("connection reset".to_string()))
        })
        .await;

        assert_eq!(data.error, Some(SessionError::RefreshAccessTokenError));
        assert_eq!(data.access_token, "opaque-access");
        assert_eq!(data.refresh_token.as_deref(), Some("opaque-refresh"));
        assert_eq!(data.expires_at, old_expiry);
    }

    #[test]
    fn test_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("fxadmin-session-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut store = Session::new(dir.clone());
        assert!(!store.load().unwrap());
        assert!(!store.is_authenticated());

        store.update(session_expiring_in(600));
        store.save().unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("opaque-access"));

        let mut reloaded = Session::new(dir.clone());
        assert!(reloaded.load().unwrap());
        assert_eq!(
            reloaded.data.as_ref().map(|d| d.email.as_str()),
            Some("admin@example.com")
        );

        store.clear().unwrap();
        assert!(store.token().is_none());
        let mut empty = Session::new(dir.clone());
        assert!(!empty.load().unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_errored_session_never_yields_a_token() {
        let dir = std::env::temp_dir().join("fxadmin-session-errored");
        let mut store = Session::new(dir);
        let mut data = session_expiring_in(600);
        data.error = Some(SessionError::RefreshAccessTokenError);
        store.update(data);

        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }
}
