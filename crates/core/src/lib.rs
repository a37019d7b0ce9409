//! Core types and traits for the fitbot registration flows
//!
//! This crate provides the foundational types used across all other crates:
//! - Profile model and the fixed field collection order
//! - Inbound event and trigger-matching types
//! - Outbound effect and keyboard types
//! - Traits for the external collaborators (chat transport, profile
//!   repository, nutrition token store)
//! - Error types

pub mod effect;
pub mod error;
pub mod event;
pub mod profile;
pub mod traits;

pub use effect::{Effect, InlineButton, Keyboard};
pub use error::{FlowError, RepoError, TransportError};
pub use event::{FlowEvent, Trigger};
pub use profile::{Profile, ProfileField, ProfilePatch, ProfileWrite, UserId, FIELD_ORDER};
pub use traits::{ApiToken, ChatTransport, ProfileRepository, TokenStore};
