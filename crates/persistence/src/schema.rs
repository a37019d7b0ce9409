//! ScyllaDB schema creation

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::Schema(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // Profiles table, one row per chat user
    let users_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.users (
            user_id BIGINT,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            email TEXT,
            phone TEXT,
            height_cm INT,
            weight_kg DOUBLE,
            age INT,
            agreed_terms BOOLEAN,
            tariff_name TEXT,
            created_at BIGINT,
            updated_at BIGINT,
            PRIMARY KEY (user_id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(users_table, &[])
        .await
        .map_err(|e| PersistenceError::Schema(format!("Failed to create users table: {}", e)))?;

    // Stored nutrition-API OAuth tokens, one row per user
    let tokens_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.nutrition_tokens (
            user_id BIGINT,
            access_token TEXT,
            refresh_token TEXT,
            expires_at BIGINT,
            scope TEXT,
            token_type TEXT,
            updated_at BIGINT,
            PRIMARY KEY (user_id)
        )
    "#,
        keyspace
    );

    session.query_unpaged(tokens_table, &[]).await.map_err(|e| {
        PersistenceError::Schema(format!("Failed to create nutrition_tokens table: {}", e))
    })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
