//! Per-field validation and canonicalization
//!
//! Pure functions: raw text in, canonical value or rejection out. The
//! registration and edit flows share these, but height and age use
//! narrower ranges in edit mode. That asymmetry is long-standing
//! product behavior and must not be unified here.

use fitbot_core::ProfileField;
use once_cell::sync::Lazy;
use regex::Regex;

/// Latin or Cyrillic letters, then letters/hyphen/apostrophe/space,
/// 2-30 characters total
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-zА-Яа-яЁё][A-Za-zА-Яа-яЁё\-'\s]{1,29}$").expect("valid name regex")
});

/// One `@`, a `.` somewhere after it, no embedded whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Which range table applies; edit mode is narrower for height and age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Registration,
    Edit,
}

/// A validated, canonicalized field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i32),
    Float(f64),
}

/// Validate raw text for a field. `None` means rejection; the caller
/// re-prompts and changes nothing.
pub fn validate(field: ProfileField, raw: &str, mode: ValidationMode) -> Option<FieldValue> {
    match field {
        ProfileField::FirstName | ProfileField::LastName => validate_name(raw),
        ProfileField::Email => validate_email(raw),
        ProfileField::Phone => validate_phone(raw),
        ProfileField::HeightCm => {
            let range = match mode {
                ValidationMode::Registration => 50..=260,
                ValidationMode::Edit => 120..=230,
            };
            validate_int(raw, range)
        }
        ProfileField::WeightKg => validate_weight(raw),
        ProfileField::Age => {
            let range = match mode {
                ValidationMode::Registration => 10..=100,
                ValidationMode::Edit => 10..=80,
            };
            validate_int(raw, range)
        }
    }
}

fn validate_name(raw: &str) -> Option<FieldValue> {
    let collapsed = collapse_whitespace(raw);
    if !NAME_RE.is_match(&collapsed) {
        return None;
    }
    Some(FieldValue::Text(title_case(&collapsed)))
}

fn validate_email(raw: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return None;
    }
    Some(FieldValue::Text(trimmed.to_string()))
}

fn validate_phone(raw: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if !(10..=12).contains(&digits) {
        return None;
    }
    // Stored as typed, digits are only counted
    Some(FieldValue::Text(trimmed.to_string()))
}

fn validate_int(raw: &str, range: std::ops::RangeInclusive<i32>) -> Option<FieldValue> {
    let value: i32 = raw.trim().parse().ok()?;
    if !range.contains(&value) {
        return None;
    }
    Some(FieldValue::Int(value))
}

fn validate_weight(raw: &str) -> Option<FieldValue> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    if !(35.0..=250.0).contains(&value) {
        return None;
    }
    Some(FieldValue::Float(value))
}

/// Trim and collapse internal whitespace runs to single spaces
fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase each letter that starts a word segment, lowercase the rest.
/// Segments break on any non-alphabetic character, so hyphenated and
/// apostrophe names come out as "Anna-Maria" and "O'Brien".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
