//! Persistence error types

use fitbot_core::RepoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("ScyllaDB query error: {0}")]
    Query(#[from] scylla::transport::errors::QueryError),

    #[error("ScyllaDB connection error: {0}")]
    Connection(#[from] scylla::transport::errors::NewSessionError),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<PersistenceError> for RepoError {
    fn from(err: PersistenceError) -> Self {
        RepoError::Backend(err.to_string())
    }
}
