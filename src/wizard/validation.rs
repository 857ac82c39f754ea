//! Step validation — decides whether the profile satisfies a step.

use crate::profile::{FieldValue, NutritionProfile, ProfileField};

use super::catalog::{StepDescriptor, StepKind};

/// Fields that must hold a value for the profile to count as complete.
pub const REQUIRED_FIELDS: [ProfileField; 11] = [
    ProfileField::Goal,
    ProfileField::Age,
    ProfileField::Gender,
    ProfileField::HeightCm,
    ProfileField::WeightKg,
    ProfileField::PhysicalActivity,
    ProfileField::CookingLevel,
    ProfileField::CookingTime,
    ProfileField::HouseholdSize,
    ProfileField::WeeklyBudgetEur,
    ProfileField::BatchCooking,
];

/// Selections that are only required while a boolean gate is `true`.
///
/// `(selection, gate)`: `selection` must be non-empty iff `gate` is set to true.
pub const CONDITIONAL_SELECTIONS: &[(ProfileField, ProfileField)] =
    &[(ProfileField::BatchDays, ProfileField::BatchCooking)];

/// Whether `profile` currently satisfies `step`.
pub fn is_step_satisfied(profile: &NutritionProfile, step: &StepDescriptor) -> bool {
    if step.optional {
        return true;
    }

    let value = profile.value(step.key);
    match step.kind {
        StepKind::FreeInput => free_input_satisfied(step.key, value),
        StepKind::SingleChoice | StepKind::Boolean => !matches!(value, FieldValue::Unset),
        StepKind::MultiChoice => {
            matches!(value, FieldValue::List(items) if step.optional || !items.is_empty())
        }
        StepKind::WeekdayMultiChoice => conditional_selection_satisfied(profile, step.key),
    }
}

fn free_input_satisfied(field: ProfileField, value: FieldValue<'_>) -> bool {
    if field == ProfileField::DislikedFoods {
        return true;
    }
    if field.is_numeric() {
        return matches!(value, FieldValue::Number(n) if n > 0);
    }
    matches!(value, FieldValue::Text(s) if !s.trim().is_empty())
}

/// The boolean field gating `selection`, if any.
pub fn selection_gate(selection: ProfileField) -> Option<ProfileField> {
    CONDITIONAL_SELECTIONS
        .iter()
        .find(|(field, _)| *field == selection)
        .map(|(_, gate)| *gate)
}

/// Evaluated against the live profile every time; nothing is cached.
fn conditional_selection_satisfied(profile: &NutritionProfile, selection: ProfileField) -> bool {
    let required = match selection_gate(selection) {
        Some(gate) => matches!(profile.value(gate), FieldValue::Flag(true)),
        None => true,
    };
    !required || matches!(profile.value(selection), FieldValue::List(items) if !items.is_empty())
}

/// Required fields that are still unset or blank.
pub fn missing_required_fields(profile: &NutritionProfile) -> Vec<ProfileField> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| matches!(profile.value(*field), FieldValue::Unset | FieldValue::Text("")))
        .collect()
}

/// Whole-profile completeness, independent of step navigation.
pub fn is_profile_complete(profile: &NutritionProfile) -> bool {
    missing_required_fields(profile).is_empty()
}
