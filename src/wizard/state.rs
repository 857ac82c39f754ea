//! Wizard session state — current step, submitting flag, and the
//! `disliked_foods` edit buffer. Transient; never persisted.

use crate::error::SyncReport;

/// Per-session navigation state.
///
/// The step index is kept within `[0, step_count - 1]` by construction.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    step_index: usize,
    submitting: bool,
    /// Raw text typed into the `disliked_foods` step, not yet split.
    disliked_foods_draft: Option<String>,
    /// Outcome of the most recent finalize.
    last_sync: Option<SyncReport>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_last(&self, step_count: usize) -> bool {
        self.step_index + 1 >= step_count
    }

    /// Move one step forward. Returns the new index, or `None` on the last step.
    pub fn forward(&mut self, step_count: usize) -> Option<usize> {
        if self.is_last(step_count) {
            return None;
        }
        self.step_index += 1;
        Some(self.step_index)
    }

    /// Move one step back. No-op at index 0.
    pub fn back(&mut self) -> usize {
        self.step_index = self.step_index.saturating_sub(1);
        self.step_index
    }

    /// Enter the submitting sub-state. Returns false if already submitting.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Leave the submitting sub-state and record how it went.
    pub fn end_submit(&mut self, report: SyncReport) {
        self.submitting = false;
        self.last_sync = Some(report);
    }

    pub fn last_sync(&self) -> Option<&SyncReport> {
        self.last_sync.as_ref()
    }

    pub fn disliked_foods_draft(&self) -> Option<&str> {
        self.disliked_foods_draft.as_deref()
    }

    pub fn set_disliked_foods_draft(&mut self, raw: impl Into<String>) {
        self.disliked_foods_draft = Some(raw.into());
    }

    pub fn take_disliked_foods_draft(&mut self) -> Option<String> {
        self.disliked_foods_draft.take()
    }
}
