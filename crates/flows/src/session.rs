//! Per-conversation session state and the collected-field bag

use dashmap::DashMap;
use fitbot_core::{Profile, ProfileField, ProfilePatch, UserId};
use serde::{Deserialize, Serialize};

use crate::state::FlowState;
use crate::validators::FieldValue;

/// Values collected so far in the active flow.
///
/// Every value present has already passed its validator; the bag itself
/// never checks anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
}

impl FormData {
    /// Seed the bag from an existing profile (edit-flow entry)
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            age: profile.age,
        }
    }

    pub fn is_set(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::FirstName => self.first_name.is_some(),
            ProfileField::LastName => self.last_name.is_some(),
            ProfileField::Email => self.email.is_some(),
            ProfileField::Phone => self.phone.is_some(),
            ProfileField::HeightCm => self.height_cm.is_some(),
            ProfileField::WeightKg => self.weight_kg.is_some(),
            ProfileField::Age => self.age.is_some(),
        }
    }

    /// Store a validated value under its field
    pub fn set(&mut self, field: ProfileField, value: FieldValue) {
        match (field, value) {
            (ProfileField::FirstName, FieldValue::Text(v)) => self.first_name = Some(v),
            (ProfileField::LastName, FieldValue::Text(v)) => self.last_name = Some(v),
            (ProfileField::Email, FieldValue::Text(v)) => self.email = Some(v),
            (ProfileField::Phone, FieldValue::Text(v)) => self.phone = Some(v),
            (ProfileField::HeightCm, FieldValue::Int(v)) => self.height_cm = Some(v),
            (ProfileField::WeightKg, FieldValue::Float(v)) => self.weight_kg = Some(v),
            (ProfileField::Age, FieldValue::Int(v)) => self.age = Some(v),
            // Validators always produce the matching variant
            (field, value) => {
                tracing::warn!(field = %field, ?value, "Mismatched field value ignored")
            }
        }
    }

    /// Rendered value for previews and menus, without unit suffix
    pub fn display(&self, field: ProfileField) -> Option<String> {
        match field {
            ProfileField::FirstName => self.first_name.clone(),
            ProfileField::LastName => self.last_name.clone(),
            ProfileField::Email => self.email.clone(),
            ProfileField::Phone => self.phone.clone(),
            ProfileField::HeightCm => self.height_cm.map(|v| v.to_string()),
            ProfileField::WeightKg => self.weight_kg.map(|v| v.to_string()),
            ProfileField::Age => self.age.map(|v| v.to_string()),
        }
    }

    /// First unset field in canonical order strictly before `target`.
    ///
    /// This is the single redirect primitive used by both the edit-menu
    /// jumps and the finalize action.
    pub fn first_missing_before(&self, target: ProfileField) -> Option<ProfileField> {
        target
            .predecessors()
            .iter()
            .copied()
            .find(|f| !self.is_set(*f))
    }

    /// First unset field in canonical order, if any
    pub fn first_missing(&self) -> Option<ProfileField> {
        fitbot_core::FIELD_ORDER
            .iter()
            .copied()
            .find(|f| !self.is_set(*f))
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Patch covering every collected field (terminal registration commit)
    pub fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            age: self.age,
            ..Default::default()
        }
    }

    /// Patch covering a single field (edit-flow commit)
    pub fn field_patch(&self, field: ProfileField) -> ProfilePatch {
        let mut patch = ProfilePatch::default();
        match field {
            ProfileField::FirstName => patch.first_name = self.first_name.clone(),
            ProfileField::LastName => patch.last_name = self.last_name.clone(),
            ProfileField::Email => patch.email = self.email.clone(),
            ProfileField::Phone => patch.phone = self.phone.clone(),
            ProfileField::HeightCm => patch.height_cm = self.height_cm,
            ProfileField::WeightKg => patch.weight_kg = self.weight_kg,
            ProfileField::Age => patch.age = self.age,
        }
        patch
    }
}

/// One conversation's flow position plus its collected values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: FlowState,
    pub data: FormData,
}

impl Session {
    /// Fresh idle session with no collected data
    pub fn idle() -> Self {
        Self::default()
    }

    /// Same data, different state
    pub fn with_state(&self, state: FlowState) -> Self {
        Self {
            state,
            data: self.data.clone(),
        }
    }
}

/// In-process session store, one session per user.
///
/// The chat transport serializes delivery per conversation, so a plain
/// concurrent map is enough; no per-entry locking beyond the map's own.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, or a fresh idle one if none exists
    pub fn get(&self, user: UserId) -> Session {
        self.sessions
            .get(&user)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Commit the post-step session. Idle sessions with no data are
    /// dropped from the map, which is what "cleared" means here.
    pub fn commit(&self, user: UserId, session: Session) {
        if session == Session::idle() {
            self.sessions.remove(&user);
        } else {
            self.sessions.insert(user, session);
        }
    }
}
