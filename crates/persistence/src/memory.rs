//! In-memory stores for tests and token-less local runs

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use fitbot_core::{
    ApiToken, Profile, ProfilePatch, ProfileRepository, RepoError, TokenStore, UserId,
};

/// In-memory profile repository backed by a concurrent map
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: DashMap<UserId, Profile>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, user: UserId) -> Result<Option<Profile>, RepoError> {
        Ok(self.profiles.get(&user).map(|p| p.clone()))
    }

    async fn upsert(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError> {
        let mut entry = self
            .profiles
            .entry(user)
            .or_insert_with(|| Profile::new(user));
        entry.apply(&patch);
        Ok(entry.clone())
    }

    async fn update(&self, user: UserId, patch: ProfilePatch) -> Result<Profile, RepoError> {
        let mut entry = self
            .profiles
            .get_mut(&user)
            .ok_or(RepoError::NotFound(user))?;
        entry.apply(&patch);
        Ok(entry.clone())
    }
}

/// In-memory token store backed by a concurrent map
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<UserId, ApiToken>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, user: UserId, token: ApiToken) -> Result<(), RepoError> {
        self.tokens.insert(user, token);
        Ok(())
    }

    async fn find_valid(&self, user: UserId) -> Result<Option<ApiToken>, RepoError> {
        Ok(self
            .tokens
            .get(&user)
            .filter(|t| !t.is_expired(Utc::now()))
            .map(|t| t.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_upsert_creates_then_merges() {
        let repo = InMemoryProfileRepository::new();
        let user = UserId(42);

        let patch = ProfilePatch {
            first_name: Some("Anna".into()),
            ..Default::default()
        };
        let profile = repo.upsert(user, patch).await.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Anna"));

        let patch = ProfilePatch {
            last_name: Some("Smith".into()),
            ..Default::default()
        };
        let profile = repo.upsert(user, patch).await.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Anna"));
        assert_eq!(profile.last_name.as_deref(), Some("Smith"));
    }

    #[tokio::test]
    async fn test_update_requires_existing_record() {
        let repo = InMemoryProfileRepository::new();
        let result = repo.update(UserId(1), ProfilePatch::default()).await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_absent() {
        let store = InMemoryTokenStore::new();
        let user = UserId(7);

        let token = ApiToken {
            access_token: "abc".into(),
            refresh_token: "def".into(),
            expires_at: Utc::now() - Duration::seconds(1),
            scope: None,
            token_type: Some("Bearer".into()),
        };
        store.save(user, token).await.unwrap();
        assert!(store.find_valid(user).await.unwrap().is_none());

        let token = ApiToken {
            access_token: "abc".into(),
            refresh_token: "def".into(),
            expires_at: Utc::now() + Duration::hours(1),
            scope: None,
            token_type: Some("Bearer".into()),
        };
        store.save(user, token).await.unwrap();
        assert!(store.find_valid(user).await.unwrap().is_some());
    }
}
