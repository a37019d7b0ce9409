//! Conversational flows: registration, profile editing, tariff selection
//!
//! The transition logic lives in [`engine::step`], a pure function over
//! (session, profile, event). [`dispatcher::Dispatcher`] wraps it with the
//! session store, the profile repository and the chat transport.

pub mod dispatcher;
pub mod engine;
pub mod render;
pub mod session;
pub mod state;
pub mod validators;

pub use dispatcher::Dispatcher;
pub use engine::{step, FlowContext, StepOutcome};
pub use session::{FormData, Session, SessionStore};
pub use state::FlowState;
pub use validators::{validate, FieldValue, ValidationMode};
