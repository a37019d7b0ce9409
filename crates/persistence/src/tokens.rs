//! Nutrition-API token persistence using ScyllaDB

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitbot_core::{ApiToken, RepoError, TokenStore, UserId};

use crate::{PersistenceError, ScyllaClient};

/// ScyllaDB implementation of the token store
#[derive(Clone)]
pub struct ScyllaTokenStore {
    client: ScyllaClient,
}

impl ScyllaTokenStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenStore for ScyllaTokenStore {
    async fn save(&self, user: UserId, token: ApiToken) -> Result<(), RepoError> {
        let query = format!(
            "INSERT INTO {}.nutrition_tokens (
                user_id, access_token, refresh_token, expires_at, scope, token_type, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    user.0,
                    &token.access_token,
                    &token.refresh_token,
                    token.expires_at.timestamp_millis(),
                    &token.scope,
                    &token.token_type,
                    Utc::now().timestamp_millis(),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(user_id = user.0, "Nutrition token saved");
        Ok(())
    }

    async fn find_valid(&self, user: UserId) -> Result<Option<ApiToken>, RepoError> {
        let query = format!(
            "SELECT access_token, refresh_token, expires_at, scope, token_type
             FROM {}.nutrition_tokens WHERE user_id = ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (user.0,))
            .await
            .map_err(PersistenceError::from)?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                let (access_token, refresh_token, expires_at, scope, token_type): (
                    String,
                    String,
                    i64,
                    Option<String>,
                    Option<String>,
                ) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))
                    .map_err(RepoError::from)?;

                let token = ApiToken {
                    access_token,
                    refresh_token,
                    expires_at: DateTime::from_timestamp_millis(expires_at)
                        .unwrap_or_else(Utc::now),
                    scope,
                    token_type,
                };

                // Expired tokens are treated as absent; the caller re-authorizes
                if !token.is_expired(Utc::now()) {
                    return Ok(Some(token));
                }
            }
        }

        Ok(None)
    }
}
