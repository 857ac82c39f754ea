//! Field normalizer — maps display labels and typed text to canonical values.
//!
//! Every function here is pure. Enum-like fields never fail: labels that do
//! not match a known value land in that field's fallback bucket. Numeric
//! input is the only thing that can be rejected.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::model::{
    ActivityLevel, CookingLevel, FieldUpdate, Gender, HouseholdSize, ProfileField, WeeklyBudget,
};

/// Result of normalizing one raw value for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// A complete value for the field.
    Value(FieldUpdate),
    /// One member of a multi-choice field; the caller toggles it in the set.
    Member(String),
    /// The input is not acceptable and the field must not be updated.
    Rejected,
}

/// Normalize `raw` for `field`.
pub fn normalize(field: ProfileField, raw: &str) -> Normalized {
    match field {
        ProfileField::Goal => Normalized::Value(FieldUpdate::Goal(raw.to_string())),
        ProfileField::CookingTime => Normalized::Value(FieldUpdate::CookingTime(raw.to_string())),
        ProfileField::Age | ProfileField::HeightCm | ProfileField::WeightKg => {
            validate_numeric_value(raw)
                .and_then(|n| FieldUpdate::number(field, n))
                .map_or(Normalized::Rejected, Normalized::Value)
        }
        ProfileField::Gender => {
            Normalized::Value(FieldUpdate::Gender(Gender::from_token(&fold_label(raw))))
        }
        ProfileField::PhysicalActivity => Normalized::Value(FieldUpdate::PhysicalActivity(
            ActivityLevel::from_token(&fold_label(raw)),
        )),
        ProfileField::CookingLevel => Normalized::Value(FieldUpdate::CookingLevel(
            CookingLevel::from_token(&fold_label(raw)),
        )),
        ProfileField::HouseholdSize => Normalized::Value(FieldUpdate::HouseholdSize(
            HouseholdSize::from_token(&fold_label(raw)),
        )),
        ProfileField::WeeklyBudgetEur => {
            Normalized::Value(FieldUpdate::WeeklyBudgetEur(classify_budget(raw)))
        }
        ProfileField::DietPreferences => Normalized::Member(fold_label(raw)),
        ProfileField::BatchDays => Normalized::Member(normalize_day_name(raw)),
        ProfileField::DislikedFoods => {
            Normalized::Value(FieldUpdate::DislikedFoods(parse_comma_separated(raw)))
        }
        ProfileField::BatchCooking => parse_yes_no(raw)
            .map_or(Normalized::Rejected, |b| {
                Normalized::Value(FieldUpdate::BatchCooking(b))
            }),
    }
}

/// Lower-case a label, join its words with `_`, and strip accents and apostrophes.
///
/// `"Non précisé"` → `"non_precise"`, `"À l’aise"` → `"a_laise"`.
pub fn fold_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(c, '\'' | '’'))
        .collect()
}

/// Classify a budget label into its band by literal substring match.
///
/// The label is never parsed as a number.
pub fn classify_budget(label: &str) -> WeeklyBudget {
    if label.contains("<30") {
        WeeklyBudget::Under30
    } else if label.contains("30–50") || label.contains("30-50") {
        WeeklyBudget::From30To50
    } else if label.contains("50–80") || label.contains("50-80") {
        WeeklyBudget::From50To80
    } else if label.contains("+80") {
        WeeklyBudget::Over80
    } else {
        WeeklyBudget::Unknown
    }
}

/// Parse the leading integer of `raw`; accept it only if strictly positive.
///
/// Leading whitespace and trailing garbage are tolerated (`" 42kg"` → 42),
/// matching how a browser number field hands text over.
pub fn validate_numeric_value(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() || negative {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

/// Weekday labels are lower-cased only.
pub fn normalize_day_name(day: &str) -> String {
    day.to_lowercase()
}

/// Split on commas, trim each entry, drop empty entries. Order is kept.
pub fn parse_comma_separated(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Inverse of [`parse_comma_separated`] for display.
pub fn format_list(items: &[String]) -> String {
    items.join(", ")
}

/// Read a yes/no label (`Oui`/`Non`, `true`/`false`).
pub fn parse_yes_no(raw: &str) -> Option<bool> {
    match fold_label(raw).as_str() {
        "oui" | "true" | "yes" => Some(true),
        "non" | "false" | "no" => Some(false),
        _ => None,
    }
}
