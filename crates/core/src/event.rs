//! Inbound events and trigger matching
//!
//! The flow core declares, per state, which inbound texts and callback
//! tokens it accepts. The surrounding router dispatches on those triggers;
//! anything that matches none of them is left for other flows.

use serde::{Deserialize, Serialize};

/// An inbound conversational event, one per turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    /// The platform start command (`/start`)
    Start,
    /// Plain text message or reply-keyboard button press
    Text { text: String },
    /// Inline button press carrying an opaque callback token
    Callback { token: String },
}

impl FlowEvent {
    /// Create a text event
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a callback event
    pub fn callback(token: impl Into<String>) -> Self {
        Self::Callback {
            token: token.into(),
        }
    }

    /// Trimmed message text, if this is a text event
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text.trim()),
            _ => None,
        }
    }

    /// Callback token, if this is a callback event
    pub fn as_callback(&self) -> Option<&str> {
        match self {
            Self::Callback { token } => Some(token.as_str()),
            _ => None,
        }
    }
}

/// A pattern an event must match to be routed into a flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Text equal to the given button label (after trimming)
    Exact(&'static str),
    /// Lowercased text containing the given fragment
    Contains(&'static str),
    /// Callback event with exactly this token
    Callback(&'static str),
    /// Callback token starting with this prefix
    CallbackPrefix(&'static str),
    /// Any text message (used by field-input states)
    AnyText,
    /// The start command
    StartCommand,
}

impl Trigger {
    pub fn matches(&self, event: &FlowEvent) -> bool {
        match self {
            Trigger::Exact(label) => event.as_text() == Some(label),
            Trigger::Contains(fragment) => event
                .as_text()
                .is_some_and(|t| t.to_lowercase().contains(fragment)),
            Trigger::Callback(token) => event.as_callback() == Some(token),
            Trigger::CallbackPrefix(prefix) => {
                event.as_callback().is_some_and(|t| t.starts_with(prefix))
            }
            Trigger::AnyText => matches!(event, FlowEvent::Text { .. }),
            Trigger::StartCommand => matches!(event, FlowEvent::Start),
        }
    }
}
