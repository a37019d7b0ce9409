//! Flow states and per-state trigger declarations

use fitbot_core::{ProfileField, Trigger};
use serde::{Deserialize, Serialize};

use crate::render::labels;

/// Where a conversation currently is.
///
/// `Register` and `EditField` carry the field being collected; the two are
/// kept apart because they validate with different ranges and commit to
/// different targets (batched upsert vs immediate single-field update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    /// No flow in progress; menu buttons and tariff selection live here
    Idle,
    /// Terms screen shown, waiting for accept or decline
    AwaitingTerms,
    /// Sequential registration, collecting the given field
    Register(ProfileField),
    /// Edit menu shown for an existing profile
    EditMenu,
    /// Editing one field of an existing profile
    EditField(ProfileField),
    /// Tariff tier screen shown, waiting for purchase or back
    TariffSelected(String),
}

impl Default for FlowState {
    fn default() -> Self {
        Self::Idle
    }
}

impl FlowState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short label for logging
    pub fn describe(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::AwaitingTerms => "awaiting_terms".to_string(),
            Self::Register(field) => format!("register:{}", field),
            Self::EditMenu => "edit_menu".to_string(),
            Self::EditField(field) => format!("edit:{}", field),
            Self::TariffSelected(name) => format!("tariff:{}", name),
        }
    }

    /// Triggers this state accepts, for the routing layer.
    ///
    /// Tariff tier names come from configuration and cannot be listed
    /// statically; in `Idle` and `TariffSelected` the engine additionally
    /// matches any text equal to a configured tier name. Everything else
    /// an event router needs is declared here.
    pub fn accepted_triggers(&self) -> Vec<Trigger> {
        let forced_exits = [
            Trigger::Exact(labels::MENU),
            Trigger::Exact(labels::PROFILE),
            Trigger::Exact(labels::TARIFF),
        ];

        match self {
            Self::Idle => vec![
                Trigger::StartCommand,
                Trigger::Exact(labels::REGISTER),
                Trigger::Contains("regist"),
                Trigger::Exact(labels::ABOUT),
                Trigger::Exact(labels::CONSULTATION),
                Trigger::Exact(labels::EDIT_PROFILE),
                Trigger::Exact(labels::CHANGE_TARIFF),
                Trigger::Exact(labels::BACK),
                Trigger::Exact(labels::MENU),
                Trigger::Exact(labels::PROFILE),
                Trigger::Exact(labels::TARIFF),
            ],
            Self::AwaitingTerms => {
                let mut triggers = vec![
                    Trigger::Exact(labels::ACCEPT),
                    Trigger::Exact(labels::DECLINE),
                    Trigger::Contains("regist"),
                ];
                triggers.extend(forced_exits);
                triggers
            }
            Self::Register(_) => {
                let mut triggers = vec![
                    Trigger::Exact(labels::CANCEL),
                    Trigger::Exact(labels::REGISTER),
                    Trigger::Callback(labels::FINALIZE_TOKEN),
                    Trigger::CallbackPrefix(labels::EDIT_TOKEN_PREFIX),
                    Trigger::AnyText,
                ];
                triggers.extend(forced_exits);
                triggers
            }
            Self::EditMenu => {
                let mut triggers = vec![
                    Trigger::Exact(labels::CANCEL),
                    Trigger::Contains("regist"),
                    Trigger::Callback(labels::FINALIZE_TOKEN),
                    Trigger::CallbackPrefix(labels::EDIT_TOKEN_PREFIX),
                ];
                triggers.extend(forced_exits);
                triggers
            }
            Self::EditField(_) => {
                let mut triggers = vec![Trigger::Exact(labels::CANCEL), Trigger::AnyText];
                triggers.extend(forced_exits);
                triggers
            }
            Self::TariffSelected(_) => {
                let mut triggers = vec![
                    Trigger::Exact(labels::PURCHASE),
                    Trigger::Exact(labels::BACK),
                    Trigger::Contains("regist"),
                ];
                triggers.extend(forced_exits);
                triggers
            }
        }
    }
}
