//! Profile model and field ordering

use serde::{Deserialize, Serialize};

/// Stable chat-platform user identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The seven collectable profile fields, in canonical collection order.
///
/// The order defines both the sequential registration flow and the
/// predecessor-completeness rule of the edit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Phone,
    HeightCm,
    WeightKg,
    Age,
}

/// Canonical collection order
pub const FIELD_ORDER: [ProfileField; 7] = [
    ProfileField::FirstName,
    ProfileField::LastName,
    ProfileField::Email,
    ProfileField::Phone,
    ProfileField::HeightCm,
    ProfileField::WeightKg,
    ProfileField::Age,
];

impl ProfileField {
    /// Position in the canonical order
    pub fn index(&self) -> usize {
        FIELD_ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Fields that must be filled before this one
    pub fn predecessors(&self) -> &'static [ProfileField] {
        &FIELD_ORDER[..self.index()]
    }

    /// Field after this one in the canonical order, if any
    pub fn next(&self) -> Option<ProfileField> {
        FIELD_ORDER.get(self.index() + 1).copied()
    }

    /// Stable snake_case name, used for callback tokens and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::HeightCm => "height_cm",
            Self::WeightKg => "weight_kg",
            Self::Age => "age",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        FIELD_ORDER.iter().copied().find(|f| f.as_str() == s)
    }

    /// Human-facing label for previews and menus
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "E-mail",
            Self::Phone => "Phone",
            Self::HeightCm => "Height",
            Self::WeightKg => "Weight",
            Self::Age => "Age",
        }
    }

    /// Unit suffix appended to rendered values
    pub fn unit(&self) -> &'static str {
        match self {
            Self::HeightCm => " cm",
            Self::WeightKg => " kg",
            _ => "",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persistent per-user profile record
///
/// Any field that is present has passed its validator at the moment it was
/// written; the repository itself never rejects writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[serde(default)]
    pub agreed_terms: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariff_name: Option<String>,
}

impl Profile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: user_id.0,
            ..Default::default()
        }
    }

    pub fn id(&self) -> UserId {
        UserId(self.user_id)
    }

    /// Whether the user has a purchased tariff
    pub fn has_tariff(&self) -> bool {
        self.tariff_name.is_some()
    }

    /// Merge-overwrite the fields present in `patch`
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(v) = &patch.username {
            self.username = Some(v.clone());
        }
        if let Some(v) = &patch.first_name {
            self.first_name = Some(v.clone());
        }
        if let Some(v) = &patch.last_name {
            self.last_name = Some(v.clone());
        }
        if let Some(v) = &patch.email {
            self.email = Some(v.clone());
        }
        if let Some(v) = &patch.phone {
            self.phone = Some(v.clone());
        }
        if let Some(v) = patch.height_cm {
            self.height_cm = Some(v);
        }
        if let Some(v) = patch.weight_kg {
            self.weight_kg = Some(v);
        }
        if let Some(v) = patch.age {
            self.age = Some(v);
        }
        if let Some(v) = patch.agreed_terms {
            self.agreed_terms = v;
        }
        if let Some(v) = &patch.tariff_name {
            self.tariff_name = Some(v.clone());
        }
    }
}

/// Partial profile write: only fields set to `Some` are touched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
    pub agreed_terms: Option<bool>,
    pub tariff_name: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.height_cm.is_none()
            && self.weight_kg.is_none()
            && self.age.is_none()
            && self.agreed_terms.is_none()
            && self.tariff_name.is_none()
    }
}

/// A pending repository mutation produced by a flow step.
///
/// The write targets the session's own user; the dispatcher supplies the
/// identity and executes the write before committing the new session
/// state, so a failed write never leaves the session advanced.
#[derive(Debug, Clone)]
pub enum ProfileWrite {
    /// Create-with-defaults or merge-overwrite, keyed by identity
    Upsert { patch: ProfilePatch },
    /// Single-record update; the record must already exist
    Update { patch: ProfilePatch },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_round_trip() {
        for field in FIELD_ORDER {
            assert_eq!(ProfileField::from_str(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_predecessors() {
        assert!(ProfileField::FirstName.predecessors().is_empty());
        assert_eq!(
            ProfileField::Email.predecessors(),
            &[ProfileField::FirstName, ProfileField::LastName]
        );
        assert_eq!(ProfileField::Age.predecessors().len(), 6);
    }

    #[test]
    fn test_next_field() {
        assert_eq!(ProfileField::FirstName.next(), Some(ProfileField::LastName));
        assert_eq!(ProfileField::Age.next(), None);
    }

    #[test]
    fn test_patch_apply_merges() {
        let mut profile = Profile::new(UserId(7));
        profile.email = Some("old@example.com".into());

        let patch = ProfilePatch {
            first_name: Some("Anna".into()),
            agreed_terms: Some(true),
            ..Default::default()
        };
        profile.apply(&patch);

        assert_eq!(profile.first_name.as_deref(), Some("Anna"));
        assert_eq!(profile.email.as_deref(), Some("old@example.com"));
        assert!(profile.agreed_terms);
    }
}
