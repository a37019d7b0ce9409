//! Traits for the external collaborators
//!
//! The flow core is transport- and storage-agnostic; everything it needs
//! from the outside world is behind these traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::effect::Keyboard;
use crate::error::{RepoError, TransportError};
use crate::profile::{Profile, ProfilePatch, UserId};

/// Chat platform message delivery.
///
/// `send_temp` messages may be auto-expired by the implementation after a
/// fixed delay; `send_keep` messages are left in place (menu screens).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_temp(
        &self,
        chat: UserId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TransportError>;

    async fn send_keep(
        &self,
        chat: UserId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TransportError>;

    /// Acknowledge a callback with a popup notice
    async fn alert(&self, chat: UserId, text: &str) -> Result<(), TransportError>;

    /// Silently acknowledge a callback
    async fn ack(&self, chat: UserId) -> Result<(), TransportError>;
}

/// Persistent profile store keyed by user identity.
///
/// `upsert` performs create-with-defaults when the record is absent and
/// merge-overwrite when present. `update` requires an existing record.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user: UserId) -> Result<Option<Profile>, RepoError>;

    async fn upsert(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError>;

    async fn update(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError>;
}

/// Stored nutrition-API access token.
///
/// The OAuth exchange itself happens elsewhere; this is only the
/// persisted result of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

impl ApiToken {
    /// Build from an OAuth response's relative `expires_in` seconds
    pub fn from_expires_in(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in_secs: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: now + chrono::Duration::seconds(expires_in_secs),
            scope: None,
            token_type: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Per-user nutrition token storage
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Upsert the token for a user
    async fn save(&self, user: UserId, token: ApiToken) -> Result<(), RepoError>;

    /// Fetch the token for a user if present and not expired
    async fn find_valid(&self, user: UserId) -> Result<Option<ApiToken>, RepoError>;
}
