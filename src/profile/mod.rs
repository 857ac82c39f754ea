//! Nutrition profile — the record the wizard collects, and how raw answers
//! become canonical values.

pub mod model;
pub mod normalize;

pub use model::{
    ActivityLevel, CookingLevel, FieldUpdate, FieldValue, Gender, HouseholdSize,
    NutritionProfile, ProfileField, WeeklyBudget,
};
pub use normalize::{Normalized, normalize};
