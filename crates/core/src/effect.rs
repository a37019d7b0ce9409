//! Outbound effects emitted by flow transitions
//!
//! A flow step never talks to the chat platform directly; it returns a
//! list of effects that the dispatcher plays into a [`ChatTransport`]
//! implementation.
//!
//! [`ChatTransport`]: crate::traits::ChatTransport

use serde::{Deserialize, Serialize};

/// A labeled inline button with an opaque callback token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub token: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    /// Reply-style keyboard: rows of plain text choices
    Choices { rows: Vec<Vec<String>> },
    /// Inline keyboard: rows of labeled buttons with callback tokens
    Inline { rows: Vec<Vec<InlineButton>> },
    /// Empty reply keyboard, suppresses the device keyboard
    Empty,
    /// No keyboard change
    None,
}

impl Keyboard {
    /// Build a choices keyboard from rows of labels
    pub fn choices<R, L>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::Choices {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn inline(rows: Vec<Vec<InlineButton>>) -> Self {
        Self::Inline { rows }
    }
}

/// Rendering request produced by a flow transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Short-lived message; the transport may auto-expire it
    SendTemp { text: String, keyboard: Keyboard },
    /// Persistent message for menus and navigation screens
    SendKeep { text: String, keyboard: Keyboard },
    /// Acknowledge a callback with a popup notice
    Alert { text: String },
    /// Silently acknowledge a callback
    Ack,
}

impl Effect {
    pub fn temp(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::SendTemp {
            text: text.into(),
            keyboard,
        }
    }

    pub fn keep(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::SendKeep {
            text: text.into(),
            keyboard,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self::Alert { text: text.into() }
    }
}
