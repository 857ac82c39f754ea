//! Step catalog — the ordered, immutable list of questionnaire steps.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::WizardError;
use crate::profile::ProfileField;

/// How a step collects its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    SingleChoice,
    MultiChoice,
    FreeInput,
    Boolean,
    WeekdayMultiChoice,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::FreeInput => "free_input",
            Self::Boolean => "boolean",
            Self::WeekdayMultiChoice => "weekday_multi_choice",
        };
        write!(f, "{s}")
    }
}

/// Weekday options, Sunday first.
pub const WEEKDAYS: &[&str] = &[
    "Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi",
];

/// Options shown for boolean steps.
pub const YES_NO: &[&str] = &["Oui", "Non"];

/// One question of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub key: ProfileField,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub options: &'static [&'static str],
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl StepDescriptor {
    pub const fn new(key: ProfileField, label: &'static str, kind: StepKind) -> Self {
        Self {
            key,
            label,
            kind,
            options: &[],
            optional: false,
            placeholder: None,
        }
    }

    pub const fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// The nutrition questionnaire, in order.
const STANDARD_STEPS: &[StepDescriptor] = &[
    StepDescriptor::new(
        ProfileField::Goal,
        "Quel est ton objectif principal ?",
        StepKind::SingleChoice,
    )
    .with_options(&[
        "Perdre du poids",
        "Gagner en énergie",
        "Prendre du muscle",
        "Manger équilibré",
    ]),
    StepDescriptor::new(ProfileField::Age, "Quel âge as-tu ?", StepKind::FreeInput)
        .with_placeholder("Ex: 25"),
    StepDescriptor::new(
        ProfileField::Gender,
        "Quel est ton genre ?",
        StepKind::SingleChoice,
    )
    .with_options(&["Femme", "Homme", "Autre", "Non précisé"]),
    StepDescriptor::new(
        ProfileField::HeightCm,
        "Quelle est ta taille en cm ?",
        StepKind::FreeInput,
    )
    .with_placeholder("Ex: 170"),
    StepDescriptor::new(
        ProfileField::WeightKg,
        "Quel est ton poids en kg ?",
        StepKind::FreeInput,
    )
    .with_placeholder("Ex: 70"),
    StepDescriptor::new(
        ProfileField::PhysicalActivity,
        "Quel est ton niveau d’activité physique ?",
        StepKind::SingleChoice,
    )
    .with_options(&["Sédentaire", "Modérée", "Régulière", "Intense", "Athlète"]),
    StepDescriptor::new(
        ProfileField::DietPreferences,
        "As-tu un régime alimentaire ?",
        StepKind::MultiChoice,
    )
    .with_options(&[
        "Végétarien",
        "Végétalien",
        "Flexitarien",
        "Sans gluten",
        "Sans lactose",
        "Pas de porc",
        "Aucun",
    ]),
    StepDescriptor::new(
        ProfileField::DislikedFoods,
        "Y a-t-il des aliments que tu veux éviter ?",
        StepKind::FreeInput,
    )
    .optional()
    .with_placeholder("Ex: champignons, tofu"),
    StepDescriptor::new(
        ProfileField::CookingLevel,
        "Quel est ton niveau en cuisine ?",
        StepKind::SingleChoice,
    )
    .with_options(&["Débutant", "À l’aise", "Expérimenté", "Passionné"]),
    StepDescriptor::new(
        ProfileField::CookingTime,
        "Combien de temps as-tu pour cuisiner ?",
        StepKind::SingleChoice,
    )
    .with_options(&["<30min", "<1h", "J'ai tout mon temps"]),
    StepDescriptor::new(
        ProfileField::HouseholdSize,
        "Tu cuisines pour combien de personnes ?",
        StepKind::SingleChoice,
    )
    .with_options(&["Solo", "Couple", "Famille"]),
    StepDescriptor::new(
        ProfileField::WeeklyBudgetEur,
        "Quel est ton budget alimentaire hebdo ?",
        StepKind::SingleChoice,
    )
    .with_options(&["<30€", "30–50€", "50–80€", "+80€"])
    .optional(),
    StepDescriptor::new(
        ProfileField::BatchCooking,
        "Veux-tu faire du batch cooking ?",
        StepKind::Boolean,
    )
    .with_options(YES_NO)
    .optional(),
    // Not optional: only required while batch cooking is on, see `validation`.
    StepDescriptor::new(
        ProfileField::BatchDays,
        "Quels jours préfères-tu cuisiner ?",
        StepKind::WeekdayMultiChoice,
    )
    .with_options(WEEKDAYS),
];

/// Ordered step list. Never empty, keys are unique.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: Vec<StepDescriptor>,
}

impl StepCatalog {
    /// Build a catalog from custom steps.
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.key) {
                return Err(WizardError::DuplicateStep {
                    key: step.key.to_string(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// The standard nutrition questionnaire.
    pub fn standard() -> Self {
        Self {
            steps: STANDARD_STEPS.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Step at `index`, clamped into range.
    pub fn step(&self, index: usize) -> &StepDescriptor {
        &self.steps[index.min(self.last_index())]
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }
}
