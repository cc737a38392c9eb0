//! Local profile cache.
//!
//! Keeps the session token and the signed-in user's profile on disk so the
//! CLI stays logged in across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use preptrack_core::model::UserProfile;

use crate::auth::AuthSession;

#[derive(Clone, Serialize, Deserialize)]
pub struct CachedSession {
    pub token: String,
    pub profile: UserProfile,
    pub stored_at: DateTime<Utc>,
}

impl std::fmt::Debug for CachedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSession")
            .field("token", &"***")
            .field("profile", &self.profile)
            .field("stored_at", &self.stored_at)
            .finish()
    }
}

impl From<AuthSession> for CachedSession {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            profile: session.user,
            stored_at: Utc::now(),
        }
    }
}

/// JSON file holding at most one cached session.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached session. A missing file means nobody is logged in.
    pub fn load(&self) -> Result<Option<CachedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read profile cache {}", self.path.display()))?;
        let session: CachedSession = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse profile cache {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn store(&self, session: &CachedSession) -> Result<()> {
        let json = serde_json::to_string_pretty(session).context("failed to serialize profile")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile cache {}", self.path.display()))?;
        debug!(path = %self.path.display(), user_id = %session.profile.id, "profile cached");
        Ok(())
    }

    /// Replace the cached profile, keeping the token.
    ///
    /// Returns `false` when there is no cached session to update.
    pub fn update_profile(&self, profile: UserProfile) -> Result<bool> {
        let Some(mut session) = self.load()? else {
            return Ok(false);
        };
        session.profile = profile;
        session.stored_at = Utc::now();
        self.store(&session)?;
        Ok(true)
    }

    /// Remove the cache file. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove profile cache {}", self.path.display()))?;
        Ok(true)
    }
}
