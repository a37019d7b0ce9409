//! Error types shared across crates

use crate::profile::UserId;
use thiserror::Error;

/// Profile repository errors
#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("no profile for user {0}")]
    NotFound(UserId),

    #[error("repository backend error: {0}")]
    Backend(String),

    #[error("repository call timed out")]
    Timeout,
}

/// Chat transport delivery errors
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Flow-level errors surfaced by the dispatcher.
///
/// Validation failures and missing-predecessor redirects are ordinary
/// flow outcomes, not errors; only genuinely unrecoverable conditions
/// land here.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("user is not registered")]
    MissingProfile,

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
