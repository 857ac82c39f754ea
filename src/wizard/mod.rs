//! Profile wizard — a step-by-step questionnaire that fills in the
//! nutrition profile.
//!
//! The catalog fixes the questions and their order. The controller walks
//! them, gating each move on the validator, and finalizes the profile on the
//! last step by submitting it to the remote store. Remote failures never
//! block the user; the local cache already holds every answer.

pub mod catalog;
pub mod controller;
pub mod routes;
pub mod state;
pub mod validation;

pub use catalog::{StepCatalog, StepDescriptor, StepKind};
pub use controller::{Advance, InputOutcome, WizardController, WizardStatus};
pub use routes::{WizardInput, WizardRouteState, wizard_routes};
pub use state::WizardSession;
pub use validation::{is_profile_complete, is_step_satisfied, missing_required_fields};
