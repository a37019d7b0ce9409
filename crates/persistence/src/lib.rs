//! Persistence layer for fitbot
//!
//! Provides persistent storage for:
//! - User profiles (the registration flow's commit target)
//! - Nutrition-API tokens (stored OAuth results, exchange happens elsewhere)
//!
//! Each store has a ScyllaDB implementation and an in-memory one; the
//! in-memory variants back tests and token-less local runs.

pub mod client;
pub mod error;
pub mod memory;
pub mod schema;
pub mod tokens;
pub mod users;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use memory::{InMemoryProfileRepository, InMemoryTokenStore};
pub use tokens::ScyllaTokenStore;
pub use users::ScyllaProfileRepository;

/// Initialize the ScyllaDB persistence layer
pub async fn init(config: ScyllaConfig) -> Result<PersistenceLayer, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;

    Ok(PersistenceLayer {
        profiles: ScyllaProfileRepository::new(client.clone()),
        tokens: ScyllaTokenStore::new(client),
    })
}

/// Combined persistence layer with all stores
pub struct PersistenceLayer {
    pub profiles: ScyllaProfileRepository,
    pub tokens: ScyllaTokenStore,
}
