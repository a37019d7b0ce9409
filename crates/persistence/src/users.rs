//! Profile persistence using ScyllaDB
//!
//! ScyllaDB has no read-modify-write primitive, so both `upsert` and
//! `update` read the current row, merge the patch in memory, and write
//! the full row back. The bot handles one update per user at a time, so
//! the read-merge-write window is not contended.

use async_trait::async_trait;
use chrono::Utc;
use fitbot_core::{Profile, ProfilePatch, ProfileRepository, RepoError, UserId};

use crate::{PersistenceError, ScyllaClient};

const PROFILE_COLUMNS: &str = "user_id, username, first_name, last_name, email, phone, \
     height_cm, weight_kg, age, agreed_terms, tariff_name";

/// ScyllaDB implementation of the profile repository
#[derive(Clone)]
pub struct ScyllaProfileRepository {
    client: ScyllaClient,
}

impl ScyllaProfileRepository {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, user: UserId) -> Result<Option<Profile>, PersistenceError> {
        let query = format!(
            "SELECT {} FROM {}.users WHERE user_id = ?",
            PROFILE_COLUMNS,
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (user.0,))
            .await?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                return Ok(Some(row_to_profile(row)?));
            }
        }

        Ok(None)
    }

    async fn write(&self, profile: &Profile) -> Result<(), PersistenceError> {
        let query = format!(
            "INSERT INTO {}.users ({}, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace(),
            PROFILE_COLUMNS
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    profile.user_id,
                    &profile.username,
                    &profile.first_name,
                    &profile.last_name,
                    &profile.email,
                    &profile.phone,
                    profile.height_cm,
                    profile.weight_kg,
                    profile.age,
                    profile.agreed_terms,
                    &profile.tariff_name,
                    Utc::now().timestamp_millis(),
                ),
            )
            .await?;

        tracing::debug!(user_id = profile.user_id, "Profile written to ScyllaDB");
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for ScyllaProfileRepository {
    async fn find(&self, user: UserId) -> Result<Option<Profile>, RepoError> {
        Ok(self.fetch(user).await?)
    }

    async fn upsert(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError> {
        let mut profile = self
            .fetch(user)
            .await?
            .unwrap_or_else(|| Profile::new(user));
        profile.apply(&patch);
        self.write(&profile).await?;
        Ok(profile)
    }

    async fn update(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError> {
        let mut profile = self
            .fetch(user)
            .await?
            .ok_or(RepoError::NotFound(user))?;
        profile.apply(&patch);
        self.write(&profile).await?;
        Ok(profile)
    }
}

fn row_to_profile(
    row: scylla::frame::response::result::Row,
) -> Result<Profile, PersistenceError> {
    let (
        user_id,
        username,
        first_name,
        last_name,
        email,
        phone,
        height_cm,
        weight_kg,
        age,
        agreed_terms,
        tariff_name,
    ): (
        i64,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<i32>,
        Option<f64>,
        Option<i32>,
        Option<bool>,
        Option<String>,
    ) = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    Ok(Profile {
        user_id,
        username,
        first_name,
        last_name,
        email,
        phone,
        height_cm,
        weight_kg,
        age,
        agreed_terms: agreed_terms.unwrap_or(false),
        tariff_name,
    })
}
