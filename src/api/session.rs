//! Bearer session handling
//!
//! A [`Session`] is handed explicitly to every authorized API call. The
//! [`SessionStore`] keeps the last session on disk so a restart does not force
//! a new login while the token is still valid.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// An authenticated API session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent in the Authorization header
    pub token: String,
    /// When the token was obtained
    pub issued_at: DateTime<Utc>,
    /// When the token stops being valid, if the server said so
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session issued now, optionally expiring after `expires_in_secs`
    pub fn new(token: impl Into<String>, expires_in_secs: Option<i64>) -> Self {
        let issued_at = Utc::now();
        Self {
            token: token.into(),
            issued_at,
            expires_at: expires_in_secs.map(|secs| issued_at + Duration::seconds(secs)),
        }
    }

    /// Whether the session is expired at `now`.
    ///
    /// Sessions without an expiry never expire client-side; the server still
    /// answers 401 once it stops accepting the token.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Whether the session is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Authorization header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Persists the current session between runs
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store backed by the platform data directory
    pub fn new() -> Self {
        Self {
            path: ProjectDirs::from("io", "ticketdesk", "ticketdesk")
                .map(|dirs| dirs.data_dir().join("session.json")),
        }
    }

    /// Store backed by an explicit file
    #[allow(dead_code)]
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Store that keeps nothing on disk
    #[allow(dead_code)]
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Result<Option<Session>> {
        match &self.path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(path)?;
                Ok(Some(serde_json::from_str(&content)?))
            }
            _ => Ok(None),
        }
    }

    /// Load the stored session, discarding it when already expired
    pub fn load_valid(&self) -> Result<Option<Session>> {
        match self.load()? {
            Some(session) if session.is_expired() => {
                tracing::info!("Stored session expired, discarding");
                self.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Save a session
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(session)?)?;
        }
        Ok(())
    }

    /// Remove the stored session
    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
