//! User-facing message catalog
//!
//! Every text the flows emit lives here so deployments can reword the
//! bot without touching flow logic. Defaults match the production copy.

use fitbot_core::ProfileField;
use serde::{Deserialize, Serialize};

/// Prompt and error text per collectable field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMessages {
    pub prompt_first_name: String,
    pub prompt_last_name: String,
    pub prompt_email: String,
    pub prompt_phone: String,
    pub prompt_height: String,
    pub prompt_weight: String,
    pub prompt_age: String,

    pub invalid_first_name: String,
    pub invalid_last_name: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    pub invalid_height: String,
    pub invalid_weight: String,
    pub invalid_age: String,
}

impl Default for FieldMessages {
    fn default() -> Self {
        Self {
            prompt_first_name: "Enter your first name:".into(),
            prompt_last_name: "Enter your last name:".into(),
            prompt_email: "Enter your e-mail:".into(),
            prompt_phone: "Enter your phone (e.g. +79991234567):".into(),
            prompt_height: "Enter your height (cm):".into(),
            prompt_weight: "Enter your weight (kg):".into(),
            prompt_age: "Enter your age (full years):".into(),

            invalid_first_name: "The first name must contain letters only, 2-30 characters."
                .into(),
            invalid_last_name: "The last name must contain letters only, 2-30 characters.".into(),
            invalid_email: "Invalid e-mail. Example: user@example.com".into(),
            invalid_phone: "Invalid phone. Example: +79991234567".into(),
            invalid_height: "Enter your height in cm (e.g. 180)".into(),
            invalid_weight: "Enter your weight in kg (e.g. 82.5)".into(),
            invalid_age: "Enter your age as a whole number (e.g. 29)".into(),
        }
    }
}

/// The full catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub fields: FieldMessages,

    /// Terms-of-service screen shown on registration entry
    pub terms: String,
    /// Sent together with the sign-up keyboard after terms are accepted
    pub registration_intro: String,
    /// Header of the registration preview card
    pub preview_header: String,
    /// Footer of the registration preview card
    pub preview_footer: String,
    /// Header of the edit-profile menu
    pub edit_header: String,

    pub registration_declined: String,
    pub registration_cancelled: String,
    pub registration_complete: String,
    /// Shown when the sign-up button is pressed mid-registration
    pub continue_hint: String,
    /// Popup when an edit jump targets a field with unfilled predecessors
    pub fill_previous_first: String,
    /// Popup when finalize is pressed with missing fields
    pub fill_all_first: String,

    pub profile_header: String,
    pub profile_not_found: String,
    pub tariff_not_purchased: String,

    pub welcome_new: String,
    pub welcome_back: String,
    pub about: String,
    pub consultation: String,
    pub main_menu: String,
    pub client_menu: String,

    pub tariff_choose: String,
    pub tariff_choose_new: String,
    /// `{tariff}` is replaced with the owned tier name
    pub tariff_owned: String,
    /// `{tariff}` is replaced with the purchased tier name
    pub tariff_purchased: String,

    /// Persistence failure notice; deliberately not worded as validation
    pub try_again: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            fields: FieldMessages::default(),

            terms: "Terms of service\n\nThe user agreement text will be placed here.\n\
                    Press Accept to continue with registration."
                .into(),
            registration_intro: "To register, fill in your details and press \"Sign up\".".into(),
            preview_header: "Fill in your details:".into(),
            preview_footer: "then press Sign up".into(),
            edit_header: "Profile editing\nChoose what to change:".into(),

            registration_declined: "Registration cancelled.".into(),
            registration_cancelled: "Cancelled. You are in the main menu.".into(),
            registration_complete: "Client registration complete!".into(),
            continue_hint: "Keep going - continue entering data above".into(),
            fill_previous_first: "Fill in the previous field first.".into(),
            fill_all_first: "Fill in all fields first.".into(),

            profile_header: "Your profile:".into(),
            profile_not_found: "Profile not found. Please sign up first.".into(),
            tariff_not_purchased: "not purchased".into(),

            welcome_new: "Welcome!\nA great intro text will appear here soon.".into(),
            welcome_back: "Welcome back! Client main menu.".into(),
            about: "A great text about the bot will appear here soon.".into(),
            consultation: "Leave your question and a coach will reach out shortly.".into(),
            main_menu: "Main menu".into(),
            client_menu: "Client main menu".into(),

            tariff_choose: "Choose a suitable tariff:".into(),
            tariff_choose_new: "Choose a new tariff:".into(),
            tariff_owned: "You have purchased the tariff: {tariff}".into(),
            tariff_purchased: "Congratulations! You purchased the {tariff} tariff".into(),

            try_again: "Something went wrong. Please try again.".into(),
        }
    }
}

impl Messages {
    /// Prompt text for a field-input state
    pub fn prompt(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.fields.prompt_first_name,
            ProfileField::LastName => &self.fields.prompt_last_name,
            ProfileField::Email => &self.fields.prompt_email,
            ProfileField::Phone => &self.fields.prompt_phone,
            ProfileField::HeightCm => &self.fields.prompt_height,
            ProfileField::WeightKg => &self.fields.prompt_weight,
            ProfileField::Age => &self.fields.prompt_age,
        }
    }

    /// Re-prompt text after a validation failure
    pub fn invalid(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.fields.invalid_first_name,
            ProfileField::LastName => &self.fields.invalid_last_name,
            ProfileField::Email => &self.fields.invalid_email,
            ProfileField::Phone => &self.fields.invalid_phone,
            ProfileField::HeightCm => &self.fields.invalid_height,
            ProfileField::WeightKg => &self.fields.invalid_weight,
            ProfileField::Age => &self.fields.invalid_age,
        }
    }

    pub fn tariff_owned(&self, tariff: &str) -> String {
        self.tariff_owned.replace("{tariff}", tariff)
    }

    pub fn tariff_purchased(&self, tariff: &str) -> String {
        self.tariff_purchased.replace("{tariff}", tariff)
    }
}
