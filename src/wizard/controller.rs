//! WizardController — drives the step state machine over a [`StepCatalog`].
//!
//! Input handlers normalize raw answers and write them through the
//! [`ProfileStore`]. Navigation is gated by the step validator; the last
//! step's primary action finalizes and submits the profile remotely.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{SyncReport, WizardError};
use crate::profile::normalize::{format_list, parse_comma_separated, parse_yes_no};
use crate::profile::{
    FieldUpdate, FieldValue, Normalized, NutritionProfile, ProfileField, normalize,
};
use crate::store::ProfileStore;

use super::catalog::{StepCatalog, StepDescriptor, StepKind};
use super::state::WizardSession;
use super::validation::{is_profile_complete, is_step_satisfied, missing_required_fields};

/// Result of the primary "next" action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Advance {
    /// Moved to the step at `index`.
    Moved { index: usize },
    /// The current step is not satisfied, or a submission is in flight.
    Blocked,
    /// Last step: the profile was finalized and a remote submission attempted.
    Submitted { report: SyncReport },
}

/// What an input handler did with the value it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOutcome {
    /// The profile was updated.
    Applied,
    /// The value was not acceptable; the profile is unchanged.
    Rejected,
    /// Held in the edit buffer until finalize.
    Buffered,
}

/// Snapshot of the wizard for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct WizardStatus {
    pub step_index: usize,
    pub total_steps: usize,
    pub step: StepDescriptor,
    pub is_last_step: bool,
    pub submitting: bool,
    pub can_advance: bool,
    pub can_skip: bool,
    /// Text to show in the input of a free-input step.
    pub input_value: String,
    pub profile_complete: bool,
    pub missing_fields: Vec<ProfileField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<SyncReport>,
    pub profile: Option<NutritionProfile>,
}

/// One wizard session over a shared profile store.
pub struct WizardController {
    store: Arc<ProfileStore>,
    catalog: Arc<StepCatalog>,
    session: RwLock<WizardSession>,
}

impl WizardController {
    pub fn new(store: Arc<ProfileStore>, catalog: Arc<StepCatalog>) -> Self {
        Self {
            store,
            catalog,
            session: RwLock::new(WizardSession::new()),
        }
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub async fn step_index(&self) -> usize {
        self.session.read().await.step_index()
    }

    pub async fn current_step(&self) -> &StepDescriptor {
        self.catalog.step(self.step_index().await)
    }

    pub async fn is_last_step(&self) -> bool {
        self.session.read().await.is_last(self.catalog.len())
    }

    pub async fn is_submitting(&self) -> bool {
        self.session.read().await.is_submitting()
    }

    /// Primary action gate: current step satisfied and nothing submitting.
    pub async fn can_advance(&self) -> bool {
        let (index, submitting) = {
            let session = self.session.read().await;
            (session.step_index(), session.is_submitting())
        };
        if submitting {
            return false;
        }
        let profile = self.store.snapshot_or_default().await;
        is_step_satisfied(&profile, self.catalog.step(index))
    }

    /// Skip is offered on optional steps that are not the last one.
    pub async fn can_skip(&self) -> bool {
        let session = self.session.read().await;
        let step = self.catalog.step(session.step_index());
        step.optional && !session.is_last(self.catalog.len())
    }

    /// Primary action. Moves forward, or finalizes on the last step.
    ///
    /// Finalizing never moves the step index, whatever the submission outcome.
    pub async fn advance(&self) -> Advance {
        // The gate and the move happen under one session write lock.
        let mut session = self.session.write().await;
        let index = session.step_index();
        let profile = self.store.snapshot_or_default().await;
        if session.is_submitting() || !is_step_satisfied(&profile, self.catalog.step(index)) {
            debug!(step = index, "Advance blocked");
            return Advance::Blocked;
        }

        match session.forward(self.catalog.len()) {
            Some(index) => {
                debug!(step = index, key = %self.catalog.step(index).key, "Advanced");
                Advance::Moved { index }
            }
            None => {
                session.begin_submit();
                let draft = session.take_disliked_foods_draft();
                drop(session);
                self.finalize(draft).await
            }
        }
    }

    /// Go back one step. No-op on the first step.
    pub async fn retreat(&self) -> usize {
        let index = self.session.write().await.back();
        debug!(step = index, "Retreated");
        index
    }

    /// Move past an optional step without finalizing. `None` when not allowed.
    pub async fn skip(&self) -> Option<usize> {
        let mut session = self.session.write().await;
        let step = self.catalog.step(session.step_index());
        if !step.optional {
            return None;
        }
        let index = session.forward(self.catalog.len())?;
        debug!(step = index, skipped = %step.key, "Skipped");
        Some(index)
    }

    /// Forget the profile and start over from the first step.
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        self.store.reset().await;
        *session = WizardSession::new();
    }

    /// Runs with the submitting flag already set.
    async fn finalize(&self, draft: Option<String>) -> Advance {
        if let Some(raw) = draft {
            let items = parse_comma_separated(&raw);
            let current = self.store.profile().await.map(|p| p.disliked_foods);
            if current.as_ref() != Some(&items) {
                self.store
                    .update_field(FieldUpdate::DislikedFoods(items))
                    .await;
            }
        }

        let outcome = self.store.sync_current(true).await;
        match &outcome {
            Ok(()) => info!("Profile finalized"),
            Err(e) => warn!("Profile finalized locally, remote submission failed: {}", e),
        }

        let report = SyncReport::from(&outcome);
        self.session.write().await.end_submit(report.clone());
        Advance::Submitted { report }
    }

    // ── Input handlers ──────────────────────────────────────────────

    /// Choose an option on a single-choice or boolean step.
    pub async fn select_option(&self, label: &str) -> Result<InputOutcome, WizardError> {
        let step = self.expect_kind(&[StepKind::SingleChoice, StepKind::Boolean], "select").await?;
        let update = match normalize(step.key, label) {
            Normalized::Value(update) => Some(update),
            Normalized::Member(member) => FieldUpdate::list(step.key, vec![member]),
            Normalized::Rejected => None,
        };
        Ok(self.apply(update).await)
    }

    /// Toggle one option of a multi-choice step.
    pub async fn toggle_option(&self, label: &str) -> Result<InputOutcome, WizardError> {
        let step = self.expect_kind(&[StepKind::MultiChoice], "toggle").await?;
        self.toggle_member(step, label).await
    }

    /// Toggle one weekday of a weekday step.
    pub async fn toggle_day(&self, day: &str) -> Result<InputOutcome, WizardError> {
        let step = self
            .expect_kind(&[StepKind::WeekdayMultiChoice], "day")
            .await?;
        self.toggle_member(step, day).await
    }

    /// Text typed into a free-input step.
    ///
    /// Numeric fields drop unparseable or non-positive input. The
    /// `disliked_foods` text is buffered as typed and split at finalize.
    pub async fn input_text(&self, raw: &str) -> Result<InputOutcome, WizardError> {
        let step = self.expect_kind(&[StepKind::FreeInput], "text").await?;
        if step.key == ProfileField::DislikedFoods {
            self.session.write().await.set_disliked_foods_draft(raw);
            return Ok(InputOutcome::Buffered);
        }

        let update = match normalize(step.key, raw) {
            Normalized::Value(update) => Some(update),
            Normalized::Member(_) | Normalized::Rejected => None,
        };
        if update.is_none() {
            debug!(key = %step.key, "Ignoring rejected input");
        }
        Ok(self.apply(update).await)
    }

    /// Yes/no answer on a boolean step.
    pub async fn choose_boolean(&self, value: bool) -> Result<InputOutcome, WizardError> {
        let step = self.expect_kind(&[StepKind::Boolean], "boolean").await?;
        Ok(self.apply(FieldUpdate::flag(step.key, value)).await)
    }

    async fn toggle_member(
        &self,
        step: &StepDescriptor,
        label: &str,
    ) -> Result<InputOutcome, WizardError> {
        let member = match normalize(step.key, label) {
            Normalized::Member(member) => member,
            Normalized::Value(update) => return Ok(self.apply(Some(update)).await),
            Normalized::Rejected => return Ok(InputOutcome::Rejected),
        };
        let build = list_variant(step.key).ok_or_else(|| mismatch(step, "toggle"))?;

        self.store
            .update_with(|profile| {
                let mut items = match profile.value(step.key) {
                    FieldValue::List(items) => items.to_vec(),
                    _ => Vec::new(),
                };
                match items.iter().position(|item| *item == member) {
                    Some(pos) => {
                        items.remove(pos);
                    }
                    None => items.push(member),
                }
                build(items)
            })
            .await;
        Ok(InputOutcome::Applied)
    }

    async fn apply(&self, update: Option<FieldUpdate>) -> InputOutcome {
        match update {
            Some(update) => {
                self.store.update_field(update).await;
                InputOutcome::Applied
            }
            None => InputOutcome::Rejected,
        }
    }

    async fn expect_kind(
        &self,
        accepted: &[StepKind],
        input: &str,
    ) -> Result<&StepDescriptor, WizardError> {
        let step = self.current_step().await;
        if accepted.contains(&step.kind) {
            Ok(step)
        } else {
            Err(mismatch(step, input))
        }
    }

    // ── Presentation ────────────────────────────────────────────────

    /// Whether `label` is the currently selected answer of the current step.
    pub async fn is_option_selected(&self, label: &str) -> bool {
        let step = self.current_step().await;
        let profile = self.store.snapshot_or_default().await;
        let current = profile.value(step.key);

        if step.kind == StepKind::Boolean {
            return parse_yes_no(label).is_some_and(|b| current == FieldValue::Flag(b));
        }
        match normalize(step.key, label) {
            Normalized::Value(update) => update.value() == current,
            Normalized::Member(member) => {
                matches!(current, FieldValue::List(items) if items.contains(&member))
            }
            Normalized::Rejected => false,
        }
    }

    /// Text for the current step's input box.
    pub async fn input_display_value(&self) -> String {
        let step = self.current_step().await;
        if step.key == ProfileField::DislikedFoods {
            if let Some(draft) = self.session.read().await.disliked_foods_draft() {
                return draft.to_string();
            }
        }
        let profile = self.store.snapshot_or_default().await;
        display_value(profile.value(step.key))
    }

    pub async fn status(&self) -> WizardStatus {
        let (step_index, submitting, is_last_step, last_sync) = {
            let session = self.session.read().await;
            (
                session.step_index(),
                session.is_submitting(),
                session.is_last(self.catalog.len()),
                session.last_sync().cloned(),
            )
        };
        let step = self.catalog.step(step_index);
        let snapshot = self.store.snapshot_or_default().await;

        WizardStatus {
            step_index,
            total_steps: self.catalog.len(),
            step: step.clone(),
            is_last_step,
            submitting,
            can_advance: !submitting && is_step_satisfied(&snapshot, step),
            can_skip: step.optional && !is_last_step,
            input_value: self.input_display_value().await,
            profile_complete: is_profile_complete(&snapshot),
            missing_fields: missing_required_fields(&snapshot),
            last_sync,
            profile: self.store.profile().await,
        }
    }
}

fn list_variant(field: ProfileField) -> Option<fn(Vec<String>) -> FieldUpdate> {
    match field {
        ProfileField::DietPreferences => Some(FieldUpdate::DietPreferences),
        ProfileField::DislikedFoods => Some(FieldUpdate::DislikedFoods),
        ProfileField::BatchDays => Some(FieldUpdate::BatchDays),
        _ => None,
    }
}

fn mismatch(step: &StepDescriptor, input: &str) -> WizardError {
    WizardError::InputMismatch {
        step: step.key.to_string(),
        kind: step.kind.to_string(),
        input: input.to_string(),
    }
}

fn display_value(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Unset => String::new(),
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Flag(b) => b.to_string(),
        FieldValue::List(items) => format_list(items),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::RemoteError;
    use crate::store::{MemoryCache, MemoryRemote, RemoteProfiles, SessionAuth};

    struct Harness {
        controller: Arc<WizardController>,
        remote: Arc<MemoryRemote>,
        auth: Arc<SessionAuth>,
    }

    fn harness_with(catalog: StepCatalog) -> Harness {
        let remote = Arc::new(MemoryRemote::new());
        let auth = Arc::new(SessionAuth::new());
        let store = Arc::new(ProfileStore::new(
            Arc::new(MemoryCache::new()),
            remote.clone(),
            auth.clone(),
            "user_profile",
        ));
        Harness {
            controller: Arc::new(WizardController::new(store, Arc::new(catalog))),
            remote,
            auth,
        }
    }

    fn harness() -> Harness {
        harness_with(StepCatalog::standard())
    }

    /// Remote whose upserts wait until the test releases them.
    struct GatedRemote {
        gate: Notify,
        inner: MemoryRemote,
    }

    #[async_trait]
    impl RemoteProfiles for GatedRemote {
        async fn upsert(&self, record: &serde_json::Value) -> Result<(), RemoteError> {
            self.gate.notified().await;
            self.inner.upsert(record).await
        }
        async fn select_one(&self, id: &str) -> Result<serde_json::Value, RemoteError> {
            self.inner.select_one(id).await
        }
    }

    async fn expect_moved(c: &WizardController, index: usize) {
        assert_eq!(c.advance().await, Advance::Moved { index });
    }

    #[tokio::test]
    async fn full_questionnaire_submits_once() {
        let h = harness();
        h.auth.sign_in("user-1").await;
        let c = &h.controller;

        assert_eq!(c.advance().await, Advance::Blocked);
        c.select_option("Perdre du poids").await.unwrap();
        expect_moved(c, 1).await;
        c.input_text("28").await.unwrap();
        expect_moved(c, 2).await;
        c.select_option("Femme").await.unwrap();
        expect_moved(c, 3).await;
        c.input_text("165").await.unwrap();
        expect_moved(c, 4).await;
        c.input_text("60").await.unwrap();
        expect_moved(c, 5).await;
        c.select_option("Modérée").await.unwrap();
        expect_moved(c, 6).await;
        c.toggle_option("Aucun").await.unwrap();
        expect_moved(c, 7).await;
        assert_eq!(
            c.input_text("champignons, tofu, ").await.unwrap(),
            InputOutcome::Buffered
        );
        expect_moved(c, 8).await;
        c.select_option("Débutant").await.unwrap();
        expect_moved(c, 9).await;
        c.select_option("<30min").await.unwrap();
        expect_moved(c, 10).await;
        c.select_option("Solo").await.unwrap();
        expect_moved(c, 11).await;
        assert_eq!(c.skip().await, Some(12));
        c.choose_boolean(true).await.unwrap();
        expect_moved(c, 13).await;

        assert!(c.is_last_step().await);
        assert_eq!(c.advance().await, Advance::Blocked);
        c.toggle_day("Lundi").await.unwrap();

        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            Advance::Submitted {
                report: SyncReport {
                    success: true,
                    error: None
                }
            }
        );
        assert_eq!(h.remote.upsert_count(), 1);
        assert_eq!(c.step_index().await, 13);
        assert!(!c.is_submitting().await);

        let row = h.remote.row("user-1").await.unwrap();
        assert_eq!(row["id"], "user-1");
        assert_eq!(row["goal"], "Perdre du poids");
        assert_eq!(row["disliked_foods"], serde_json::json!(["champignons", "tofu"]));
        assert_eq!(row["batch_days"], serde_json::json!(["lundi"]));

        let status = c.status().await;
        assert!(status.last_sync.unwrap().success);
        assert!(status.is_last_step);
        assert_eq!(
            status.profile.unwrap().disliked_foods,
            vec!["champignons", "tofu"]
        );
    }

    #[tokio::test]
    async fn anonymous_finalize_keeps_profile_local() {
        let catalog = StepCatalog::new(vec![StepDescriptor::new(
            ProfileField::Goal,
            "Objectif ?",
            StepKind::FreeInput,
        )])
        .unwrap();
        let h = harness_with(catalog);
        let c = &h.controller;

        c.input_text("Manger équilibré").await.unwrap();
        let outcome = c.advance().await;
        assert_eq!(
            outcome,
            Advance::Submitted {
                report: SyncReport {
                    success: false,
                    error: Some("User not authenticated".to_string())
                }
            }
        );
        assert_eq!(h.remote.upsert_count(), 0);
        assert_eq!(c.step_index().await, 0);
        assert!(!c.is_submitting().await);
        assert!(c.store().profile().await.unwrap().id.is_none());
    }

    #[tokio::test]
    async fn finalize_without_profile_reports_no_profile() {
        let catalog = StepCatalog::new(vec![
            StepDescriptor::new(ProfileField::Goal, "Objectif ?", StepKind::FreeInput).optional(),
        ])
        .unwrap();
        let h = harness_with(catalog);
        h.auth.sign_in("user-2").await;

        let outcome = h.controller.advance().await;
        assert!(matches!(
            outcome,
            Advance::Submitted { report } if report.error.as_deref() == Some("No profile to save")
        ));
        assert_eq!(h.remote.upsert_count(), 0);
    }

    #[tokio::test]
    async fn second_finalize_is_refused_while_submitting() {
        let remote = Arc::new(GatedRemote {
            gate: Notify::new(),
            inner: MemoryRemote::new(),
        });
        let auth = Arc::new(SessionAuth::new());
        auth.sign_in("user-5").await;
        let store = Arc::new(ProfileStore::new(
            Arc::new(MemoryCache::new()),
            remote.clone(),
            auth,
            "user_profile",
        ));
        let catalog = StepCatalog::new(vec![StepDescriptor::new(
            ProfileField::Age,
            "Âge ?",
            StepKind::FreeInput,
        )])
        .unwrap();
        let controller = Arc::new(WizardController::new(store, Arc::new(catalog)));
        controller.input_text("33").await.unwrap();

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.advance().await }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while !controller.is_submitting().await {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("first finalize should start submitting");

        assert!(!controller.can_advance().await);
        assert_eq!(controller.advance().await, Advance::Blocked);

        remote.gate.notify_one();
        let outcome = tokio::time::timeout(Duration::from_secs(5), first)
            .await
            .expect("first finalize should finish")
            .unwrap();
        assert!(matches!(outcome, Advance::Submitted { report } if report.success));
        assert_eq!(remote.inner.upsert_count(), 1);
        assert!(controller.can_advance().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_advances_move_one_step() {
        let h = harness();
        let c = &h.controller;
        c.select_option("Perdre du poids").await.unwrap();

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let controller = h.controller.clone();
                tokio::spawn(async move { controller.advance().await })
            })
            .collect();
        let mut outcomes = Vec::new();
        for task in tasks {
            outcomes.push(
                tokio::time::timeout(Duration::from_secs(5), task)
                    .await
                    .expect("advance should finish")
                    .unwrap(),
            );
        }

        assert!(outcomes.contains(&Advance::Moved { index: 1 }));
        assert!(outcomes.contains(&Advance::Blocked), "{outcomes:?}");
        assert_eq!(c.step_index().await, 1);
        assert!(c.store().profile().await.unwrap().age.is_none());
    }

    #[tokio::test]
    async fn retreat_stops_at_first_step() {
        let h = harness();
        let c = &h.controller;
        assert_eq!(c.retreat().await, 0);

        c.select_option("Prendre du muscle").await.unwrap();
        expect_moved(c, 1).await;
        assert_eq!(c.retreat().await, 0);
        assert_eq!(c.retreat().await, 0);
    }

    #[tokio::test]
    async fn skip_only_on_optional_steps() {
        let h = harness();
        let c = &h.controller;
        assert!(!c.can_skip().await);
        assert_eq!(c.skip().await, None);
        assert_eq!(c.step_index().await, 0);
    }

    #[tokio::test]
    async fn skip_refused_on_optional_last_step() {
        let catalog = StepCatalog::new(vec![
            StepDescriptor::new(ProfileField::Goal, "Objectif ?", StepKind::FreeInput),
            StepDescriptor::new(ProfileField::WeeklyBudgetEur, "Budget ?", StepKind::SingleChoice)
                .with_options(&["<30€", "+80€"])
                .optional(),
        ])
        .unwrap();
        let h = harness_with(catalog);
        let c = &h.controller;
        c.input_text("Perdre du poids").await.unwrap();
        expect_moved(c, 1).await;

        assert!(!c.can_skip().await);
        assert_eq!(c.skip().await, None);
        assert!(c.can_advance().await, "optional last step can still finalize");
    }

    #[tokio::test]
    async fn numeric_input_rejects_zero_and_negative() {
        let h = harness();
        let c = &h.controller;
        c.select_option("Perdre du poids").await.unwrap();
        expect_moved(c, 1).await;

        assert_eq!(c.input_text("0").await.unwrap(), InputOutcome::Rejected);
        assert_eq!(c.input_text("-5").await.unwrap(), InputOutcome::Rejected);
        assert!(c.store().profile().await.unwrap().age.is_none());
        assert!(!c.can_advance().await);

        assert_eq!(c.input_text("42").await.unwrap(), InputOutcome::Applied);
        assert_eq!(c.store().profile().await.unwrap().age, Some(42));
        assert_eq!(c.input_display_value().await, "42");
    }

    #[tokio::test]
    async fn double_toggle_restores_selection() {
        let catalog = StepCatalog::new(vec![
            StepDescriptor::new(ProfileField::DietPreferences, "Régime ?", StepKind::MultiChoice)
                .with_options(&["Végétarien", "Sans gluten"]),
        ])
        .unwrap();
        let h = harness_with(catalog);
        let c = &h.controller;

        c.toggle_option("Végétarien").await.unwrap();
        let before = c.store().profile().await.unwrap().diet_preferences;

        c.toggle_option("Sans gluten").await.unwrap();
        assert!(c.is_option_selected("Sans gluten").await);
        c.toggle_option("Sans gluten").await.unwrap();
        assert!(!c.is_option_selected("Sans gluten").await);

        assert_eq!(c.store().profile().await.unwrap().diet_preferences, before);
        assert_eq!(before, vec!["vegetarien"]);
    }

    #[tokio::test]
    async fn input_routed_to_wrong_step_kind_is_an_error() {
        let h = harness();
        let err = h.controller.toggle_day("Lundi").await.unwrap_err();
        assert!(matches!(err, WizardError::InputMismatch { ref step, .. } if step == "goal"));
        assert!(h.controller.choose_boolean(true).await.is_err());
        assert!(h.controller.store().profile().await.is_none());
    }

    #[tokio::test]
    async fn boolean_step_accepts_labels_and_flags() {
        let catalog = StepCatalog::new(vec![
            StepDescriptor::new(ProfileField::BatchCooking, "Batch ?", StepKind::Boolean)
                .with_options(crate::wizard::catalog::YES_NO),
        ])
        .unwrap();
        let h = harness_with(catalog);
        let c = &h.controller;

        assert!(!c.can_advance().await);
        assert_eq!(c.select_option("Non").await.unwrap(), InputOutcome::Applied);
        assert!(c.is_option_selected("Non").await);
        assert!(!c.is_option_selected("Oui").await);
        assert!(c.can_advance().await, "false is a valid answer");

        c.choose_boolean(true).await.unwrap();
        assert!(c.is_option_selected("Oui").await);
        assert_eq!(c.select_option("Peut-être").await.unwrap(), InputOutcome::Rejected);
    }

    #[tokio::test]
    async fn single_choice_selection_is_canonical() {
        let h = harness();
        let c = &h.controller;
        c.select_option("Gagner en énergie").await.unwrap();
        expect_moved(c, 1).await;
        c.input_text("30").await.unwrap();
        expect_moved(c, 2).await;

        c.select_option("Non précisé").await.unwrap();
        assert!(c.is_option_selected("Non précisé").await);
        assert!(!c.is_option_selected("Femme").await);
        assert_eq!(
            c.store().profile().await.unwrap().gender,
            Some(crate::profile::Gender::NonPrecise)
        );
    }

    #[tokio::test]
    async fn disliked_foods_display_prefers_draft() {
        let catalog = StepCatalog::new(vec![
            StepDescriptor::new(ProfileField::DislikedFoods, "À éviter ?", StepKind::FreeInput)
                .optional(),
        ])
        .unwrap();
        let h = harness_with(catalog);
        let c = &h.controller;

        c.store()
            .update_field(FieldUpdate::DislikedFoods(vec![
                "olives".to_string(),
                "anchois".to_string(),
            ]))
            .await;
        assert_eq!(c.input_display_value().await, "olives, anchois");

        c.input_text("olives, anch").await.unwrap();
        assert_eq!(c.input_display_value().await, "olives, anch");
        assert_eq!(
            c.store().profile().await.unwrap().disliked_foods,
            vec!["olives", "anchois"],
            "draft is not written until finalize"
        );
    }

    #[tokio::test]
    async fn reset_returns_to_first_step() {
        let h = harness();
        let c = &h.controller;
        c.select_option("Manger équilibré").await.unwrap();
        expect_moved(c, 1).await;

        c.reset().await;
        assert_eq!(c.step_index().await, 0);
        assert!(c.store().profile().await.is_none());
    }

    #[tokio::test]
    async fn status_reflects_session() {
        let h = harness();
        let c = &h.controller;
        let status = c.status().await;
        assert_eq!(status.step_index, 0);
        assert_eq!(status.total_steps, 14);
        assert_eq!(status.step.key, ProfileField::Goal);
        assert!(!status.can_advance);
        assert!(!status.profile_complete);
        assert_eq!(status.missing_fields.len(), 11);
        assert!(status.profile.is_none());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["step"]["type"], "single_choice");
        assert!(json.get("last_sync").is_none());
    }
}
