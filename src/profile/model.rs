//! Nutrition profile data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every field of a [`NutritionProfile`] the wizard can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Goal,
    Age,
    Gender,
    HeightCm,
    WeightKg,
    PhysicalActivity,
    DietPreferences,
    DislikedFoods,
    CookingLevel,
    CookingTime,
    HouseholdSize,
    WeeklyBudgetEur,
    BatchCooking,
    BatchDays,
}

impl ProfileField {
    /// All fields, in questionnaire order.
    pub const ALL: [ProfileField; 14] = [
        Self::Goal,
        Self::Age,
        Self::Gender,
        Self::HeightCm,
        Self::WeightKg,
        Self::PhysicalActivity,
        Self::DietPreferences,
        Self::DislikedFoods,
        Self::CookingLevel,
        Self::CookingTime,
        Self::HouseholdSize,
        Self::WeeklyBudgetEur,
        Self::BatchCooking,
        Self::BatchDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::HeightCm => "height_cm",
            Self::WeightKg => "weight_kg",
            Self::PhysicalActivity => "physical_activity",
            Self::DietPreferences => "diet_preferences",
            Self::DislikedFoods => "disliked_foods",
            Self::CookingLevel => "cooking_level",
            Self::CookingTime => "cooking_time",
            Self::HouseholdSize => "household_size",
            Self::WeeklyBudgetEur => "weekly_budget_eur",
            Self::BatchCooking => "batch_cooking",
            Self::BatchDays => "batch_days",
        }
    }

    /// Whether the field holds a positive integer typed as free input.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Age | Self::HeightCm | Self::WeightKg)
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Homme,
    Femme,
    Autre,
    NonPrecise,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homme => "homme",
            Self::Femme => "femme",
            Self::Autre => "autre",
            Self::NonPrecise => "non_precise",
        }
    }

    /// Map a normalized token to a variant. Unknown tokens become `NonPrecise`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "homme" => Self::Homme,
            "femme" => Self::Femme,
            "autre" => Self::Autre,
            _ => Self::NonPrecise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentaire,
    Moderee,
    Reguliere,
    Intense,
    /// Anything outside the four known levels (e.g. "Athlète").
    Autre,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentaire => "sedentaire",
            Self::Moderee => "moderee",
            Self::Reguliere => "reguliere",
            Self::Intense => "intense",
            Self::Autre => "autre",
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token {
            "sedentaire" => Self::Sedentaire,
            "moderee" => Self::Moderee,
            "reguliere" => Self::Reguliere,
            "intense" => Self::Intense,
            _ => Self::Autre,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingLevel {
    Debutant,
    #[serde(rename = "a_laise")]
    ALaise,
    Experimente,
    Passionne,
}

impl CookingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debutant => "debutant",
            Self::ALaise => "a_laise",
            Self::Experimente => "experimente",
            Self::Passionne => "passionne",
        }
    }

    /// Unknown tokens fall back to `Debutant`, the lowest level.
    pub fn from_token(token: &str) -> Self {
        match token {
            "a_laise" => Self::ALaise,
            "experimente" => Self::Experimente,
            "passionne" => Self::Passionne,
            _ => Self::Debutant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdSize {
    Solo,
    Couple,
    Famille,
    Variable,
}

impl HouseholdSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Couple => "couple",
            Self::Famille => "famille",
            Self::Variable => "variable",
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token {
            "solo" => Self::Solo,
            "couple" => Self::Couple,
            "famille" => Self::Famille,
            _ => Self::Variable,
        }
    }
}

/// Weekly food budget band, in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeeklyBudget {
    #[serde(rename = "moins_30")]
    Under30,
    #[serde(rename = "30_50")]
    From30To50,
    #[serde(rename = "50_80")]
    From50To80,
    #[serde(rename = "plus_80")]
    Over80,
    #[serde(rename = "inconnu")]
    Unknown,
}

impl WeeklyBudget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under30 => "moins_30",
            Self::From30To50 => "30_50",
            Self::From50To80 => "50_80",
            Self::Over80 => "plus_80",
            Self::Unknown => "inconnu",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        })+
    };
}

display_as_str!(Gender, ActivityLevel, CookingLevel, HouseholdSize, WeeklyBudget);

/// The user's nutrition profile.
///
/// Stored as JSON in the local cache slot and upserted remotely by `id`.
/// Unset single values are `None`; unset collections are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionProfile {
    /// Remote identity, absent until the first authenticated submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub height_cm: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<u32>,
    #[serde(default)]
    pub physical_activity: Option<ActivityLevel>,
    #[serde(default)]
    pub diet_preferences: Vec<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub cooking_level: Option<CookingLevel>,
    #[serde(default)]
    pub cooking_time: Option<String>,
    #[serde(default)]
    pub household_size: Option<HouseholdSize>,
    #[serde(default)]
    pub weekly_budget_eur: Option<WeeklyBudget>,
    #[serde(default)]
    pub batch_cooking: Option<bool>,
    #[serde(default)]
    pub batch_days: Vec<String>,
    /// Set once, at the first remote submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for NutritionProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl NutritionProfile {
    /// A profile with every field present and unset.
    pub fn new() -> Self {
        Self {
            id: None,
            goal: None,
            age: None,
            gender: None,
            height_cm: None,
            weight_kg: None,
            physical_activity: None,
            diet_preferences: Vec::new(),
            disliked_foods: Vec::new(),
            cooking_level: None,
            cooking_time: None,
            household_size: None,
            weekly_budget_eur: None,
            batch_cooking: None,
            batch_days: Vec::new(),
            created_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Apply a single field update. Does not touch `updated_at`.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Goal(v) => self.goal = Some(v),
            FieldUpdate::Age(v) => self.age = Some(v),
            FieldUpdate::Gender(v) => self.gender = Some(v),
            FieldUpdate::HeightCm(v) => self.height_cm = Some(v),
            FieldUpdate::WeightKg(v) => self.weight_kg = Some(v),
            FieldUpdate::PhysicalActivity(v) => self.physical_activity = Some(v),
            FieldUpdate::DietPreferences(v) => self.diet_preferences = v,
            FieldUpdate::DislikedFoods(v) => self.disliked_foods = v,
            FieldUpdate::CookingLevel(v) => self.cooking_level = Some(v),
            FieldUpdate::CookingTime(v) => self.cooking_time = Some(v),
            FieldUpdate::HouseholdSize(v) => self.household_size = Some(v),
            FieldUpdate::WeeklyBudgetEur(v) => self.weekly_budget_eur = Some(v),
            FieldUpdate::BatchCooking(v) => self.batch_cooking = Some(v),
            FieldUpdate::BatchDays(v) => self.batch_days = v,
        }
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Read a field through the type-erased [`FieldValue`] view.
    pub fn value(&self, field: ProfileField) -> FieldValue<'_> {
        fn text<'a>(v: &'a Option<String>) -> FieldValue<'a> {
            v.as_deref().map_or(FieldValue::Unset, FieldValue::Text)
        }
        fn number(v: Option<u32>) -> FieldValue<'static> {
            v.map_or(FieldValue::Unset, FieldValue::Number)
        }

        match field {
            ProfileField::Goal => text(&self.goal),
            ProfileField::Age => number(self.age),
            ProfileField::Gender => self
                .gender
                .map_or(FieldValue::Unset, |v| FieldValue::Text(v.as_str())),
            ProfileField::HeightCm => number(self.height_cm),
            ProfileField::WeightKg => number(self.weight_kg),
            ProfileField::PhysicalActivity => self
                .physical_activity
                .map_or(FieldValue::Unset, |v| FieldValue::Text(v.as_str())),
            ProfileField::DietPreferences => FieldValue::List(&self.diet_preferences),
            ProfileField::DislikedFoods => FieldValue::List(&self.disliked_foods),
            ProfileField::CookingLevel => self
                .cooking_level
                .map_or(FieldValue::Unset, |v| FieldValue::Text(v.as_str())),
            ProfileField::CookingTime => text(&self.cooking_time),
            ProfileField::HouseholdSize => self
                .household_size
                .map_or(FieldValue::Unset, |v| FieldValue::Text(v.as_str())),
            ProfileField::WeeklyBudgetEur => self
                .weekly_budget_eur
                .map_or(FieldValue::Unset, |v| FieldValue::Text(v.as_str())),
            ProfileField::BatchCooking => self
                .batch_cooking
                .map_or(FieldValue::Unset, FieldValue::Flag),
            ProfileField::BatchDays => FieldValue::List(&self.batch_days),
        }
    }
}

/// A typed value for exactly one profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Goal(String),
    Age(u32),
    Gender(Gender),
    HeightCm(u32),
    WeightKg(u32),
    PhysicalActivity(ActivityLevel),
    DietPreferences(Vec<String>),
    DislikedFoods(Vec<String>),
    CookingLevel(CookingLevel),
    CookingTime(String),
    HouseholdSize(HouseholdSize),
    WeeklyBudgetEur(WeeklyBudget),
    BatchCooking(bool),
    BatchDays(Vec<String>),
}

impl FieldUpdate {
    pub fn field(&self) -> ProfileField {
        match self {
            Self::Goal(_) => ProfileField::Goal,
            Self::Age(_) => ProfileField::Age,
            Self::Gender(_) => ProfileField::Gender,
            Self::HeightCm(_) => ProfileField::HeightCm,
            Self::WeightKg(_) => ProfileField::WeightKg,
            Self::PhysicalActivity(_) => ProfileField::PhysicalActivity,
            Self::DietPreferences(_) => ProfileField::DietPreferences,
            Self::DislikedFoods(_) => ProfileField::DislikedFoods,
            Self::CookingLevel(_) => ProfileField::CookingLevel,
            Self::CookingTime(_) => ProfileField::CookingTime,
            Self::HouseholdSize(_) => ProfileField::HouseholdSize,
            Self::WeeklyBudgetEur(_) => ProfileField::WeeklyBudgetEur,
            Self::BatchCooking(_) => ProfileField::BatchCooking,
            Self::BatchDays(_) => ProfileField::BatchDays,
        }
    }

    /// The value this update would store, in the same view as [`NutritionProfile::value`].
    pub fn value(&self) -> FieldValue<'_> {
        match self {
            Self::Goal(v) | Self::CookingTime(v) => FieldValue::Text(v),
            Self::Age(v) | Self::HeightCm(v) | Self::WeightKg(v) => FieldValue::Number(*v),
            Self::Gender(v) => FieldValue::Text(v.as_str()),
            Self::PhysicalActivity(v) => FieldValue::Text(v.as_str()),
            Self::CookingLevel(v) => FieldValue::Text(v.as_str()),
            Self::HouseholdSize(v) => FieldValue::Text(v.as_str()),
            Self::WeeklyBudgetEur(v) => FieldValue::Text(v.as_str()),
            Self::DietPreferences(v) | Self::DislikedFoods(v) | Self::BatchDays(v) => {
                FieldValue::List(v)
            }
            Self::BatchCooking(v) => FieldValue::Flag(*v),
        }
    }

    /// Build an update for a list-valued field. `None` for scalar fields.
    pub fn list(field: ProfileField, items: Vec<String>) -> Option<Self> {
        match field {
            ProfileField::DietPreferences => Some(Self::DietPreferences(items)),
            ProfileField::DislikedFoods => Some(Self::DislikedFoods(items)),
            ProfileField::BatchDays => Some(Self::BatchDays(items)),
            _ => None,
        }
    }

    /// Build an update for a numeric field. `None` for other fields.
    pub fn number(field: ProfileField, value: u32) -> Option<Self> {
        match field {
            ProfileField::Age => Some(Self::Age(value)),
            ProfileField::HeightCm => Some(Self::HeightCm(value)),
            ProfileField::WeightKg => Some(Self::WeightKg(value)),
            _ => None,
        }
    }

    /// Build an update for a boolean field. `None` for other fields.
    pub fn flag(field: ProfileField, value: bool) -> Option<Self> {
        match field {
            ProfileField::BatchCooking => Some(Self::BatchCooking(value)),
            _ => None,
        }
    }
}

/// Borrowed, type-erased view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Unset,
    Text(&'a str),
    Number(u32),
    Flag(bool),
    List(&'a [String]),
}
