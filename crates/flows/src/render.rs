//! Keyboard layouts and screen rendering
//!
//! All button labels and callback tokens live here so the engine matches
//! against the same constants the keyboards are built from.

use fitbot_config::{Messages, Tariffs};
use fitbot_core::{InlineButton, Keyboard, Profile, ProfileField, FIELD_ORDER};

use crate::session::FormData;

/// Button labels and callback tokens
pub mod labels {
    pub const REGISTER: &str = "Register";
    pub const ABOUT: &str = "About us";
    pub const CONSULTATION: &str = "Consultation";
    pub const MENU: &str = "Menu";
    pub const PROFILE: &str = "Profile";
    pub const TARIFF: &str = "Tariff";
    pub const EDIT_PROFILE: &str = "Edit data";

    pub const ACCEPT: &str = "Accept";
    pub const DECLINE: &str = "Decline";
    pub const CANCEL: &str = "Cancel";
    pub const SIGN_UP: &str = "Sign up";
    pub const DONE: &str = "Done";

    pub const PURCHASE: &str = "Purchase";
    pub const BACK: &str = "Back to menu";
    pub const CHANGE_TARIFF: &str = "Change tariff";

    pub const FINALIZE_TOKEN: &str = "finalize";
    pub const EDIT_TOKEN_PREFIX: &str = "edit_";
}

/// Callback token that jumps to editing `field`
pub fn edit_token(field: ProfileField) -> String {
    format!("{}{}", labels::EDIT_TOKEN_PREFIX, field.as_str())
}

/// Field addressed by an `edit_*` callback token, if any
pub fn field_from_token(token: &str) -> Option<ProfileField> {
    let name = token.strip_prefix(labels::EDIT_TOKEN_PREFIX)?;
    ProfileField::from_str(name)
}

/// Menu for users without a profile
pub fn main_menu() -> Keyboard {
    Keyboard::choices([
        vec![labels::REGISTER],
        vec![labels::ABOUT, labels::CONSULTATION],
    ])
}

/// Menu for registered users
pub fn client_menu() -> Keyboard {
    Keyboard::choices([
        vec![labels::PROFILE, labels::TARIFF],
        vec![labels::EDIT_PROFILE, labels::CONSULTATION],
    ])
}

pub fn terms_keyboard() -> Keyboard {
    Keyboard::choices([vec![labels::ACCEPT, labels::DECLINE]])
}

pub fn cancel_keyboard() -> Keyboard {
    Keyboard::choices([vec![labels::CANCEL]])
}

/// Tier list plus a way back
pub fn tariff_menu(tariffs: &Tariffs) -> Keyboard {
    let mut rows: Vec<Vec<String>> = tariffs
        .names()
        .into_iter()
        .map(|name| vec![name.to_string()])
        .collect();
    rows.push(vec![labels::BACK.to_string()]);
    Keyboard::Choices { rows }
}

pub fn purchase_keyboard() -> Keyboard {
    Keyboard::choices([vec![labels::PURCHASE], vec![labels::BACK]])
}

pub fn tariff_owned_keyboard() -> Keyboard {
    Keyboard::choices([vec![labels::CHANGE_TARIFF], vec![labels::BACK]])
}

/// Choices shown under the profile card
pub fn profile_keyboard() -> Keyboard {
    Keyboard::choices([vec![labels::EDIT_PROFILE], vec![labels::BACK]])
}

fn field_line(data: &FormData, field: ProfileField) -> String {
    match data.display(field) {
        Some(value) => format!("{}: {}{}", field.label(), value, field.unit()),
        None => format!("{}: —", field.label()),
    }
}

fn field_buttons(data: &FormData) -> Vec<Vec<InlineButton>> {
    FIELD_ORDER
        .iter()
        .map(|&field| vec![InlineButton::new(field_line(data, field), edit_token(field))])
        .collect()
}

/// Registration preview card: one row per field, then the submit button
pub fn preview(data: &FormData, messages: &Messages) -> (String, Keyboard) {
    let text = format!("{}\n{}", messages.preview_header, messages.preview_footer);
    let mut rows = field_buttons(data);
    rows.push(vec![InlineButton::new(
        labels::SIGN_UP,
        labels::FINALIZE_TOKEN,
    )]);
    (text, Keyboard::inline(rows))
}

/// Edit-profile menu, same card with a different header and exit label
pub fn edit_menu(data: &FormData, messages: &Messages) -> (String, Keyboard) {
    let mut rows = field_buttons(data);
    rows.push(vec![InlineButton::new(labels::DONE, labels::FINALIZE_TOKEN)]);
    (messages.edit_header.clone(), Keyboard::inline(rows))
}

/// Read-only profile card
pub fn profile_card(profile: &Profile, messages: &Messages) -> String {
    let data = FormData::from_profile(profile);
    let mut lines = vec![messages.profile_header.clone()];
    for field in FIELD_ORDER {
        lines.push(field_line(&data, field));
    }
    let tariff = profile
        .tariff_name
        .as_deref()
        .unwrap_or(&messages.tariff_not_purchased);
    lines.push(format!("Tariff: {}", tariff));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitbot_core::UserId;

    #[test]
    fn test_edit_token_round_trip() {
        for field in FIELD_ORDER {
            assert_eq!(field_from_token(&edit_token(field)), Some(field));
        }
        assert_eq!(field_from_token("finalize"), None);
        assert_eq!(field_from_token("edit_bogus"), None);
    }

    #[test]
    fn test_preview_has_submit_row() {
        let (_, keyboard) = preview(&FormData::default(), &Messages::default());
        let Keyboard::Inline { rows } = keyboard else {
            panic!("preview must be inline");
        };
        assert_eq!(rows.len(), FIELD_ORDER.len() + 1);
        assert_eq!(rows.last().unwrap()[0].token, labels::FINALIZE_TOKEN);
    }

    #[test]
    fn test_profile_card_shows_units_and_tariff() {
        let mut profile = Profile::new(UserId(1));
        profile.first_name = Some("Anna".into());
        profile.height_cm = Some(170);

        let card = profile_card(&profile, &Messages::default());
        assert!(card.contains("First name: Anna"));
        assert!(card.contains("Height: 170 cm"));
        assert!(card.contains("not purchased"));

        profile.tariff_name = Some("Basic".into());
        let card = profile_card(&profile, &Messages::default());
        assert!(card.contains("Tariff: Basic"));
    }

    #[test]
    fn test_tariff_menu_lists_tiers() {
        let keyboard = tariff_menu(&Tariffs::default());
        let Keyboard::Choices { rows } = keyboard else {
            panic!("tariff menu must be a choices keyboard");
        };
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["Basic".to_string()]);
        assert_eq!(rows[3], vec![labels::BACK.to_string()]);
    }
}
