//! Live progress through the onboarding flow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::record::OnboardingRecord;
use super::steps::{self, REQUIRED_STEPS, WELCOME_STEP};

/// How a successful step save moves the flow along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Stay on the saved step.
    #[default]
    Save,
    /// Move on to the next step in sequence.
    SaveAndContinue,
}

/// Runtime onboarding progress for one open flow.
///
/// `completed_steps` only ever grows during a session. `current_step` is
/// either a valid step id or [`WELCOME_STEP`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub current_step: u8,
    pub completed_steps: BTreeSet<u8>,
}

impl ProgressState {
    /// Restore progress from a persisted record, or start fresh.
    pub fn from_record(record: Option<&OnboardingRecord>) -> Self {
        match record {
            Some(r) => Self {
                current_step: r.current_step,
                completed_steps: r.completed_steps.clone(),
            },
            None => Self::default(),
        }
    }

    pub fn is_completed(&self, step_id: u8) -> bool {
        self.completed_steps.contains(&step_id)
    }

    /// Navigate to `step_id`.
    ///
    /// Callers only offer unlocked steps, so no status check happens here.
    pub fn select_step(&mut self, step_id: u8) {
        self.current_step = step_id;
    }

    /// Mark `step_id` completed after its save succeeded.
    ///
    /// Must only be called once the save has resolved without error.
    /// Re-completing a step is a no-op on the completed set. With
    /// [`SaveMode::SaveAndContinue`] the flow moves to the next step, or
    /// stays put if `step_id` is the last one.
    pub fn complete_step(&mut self, step_id: u8, mode: SaveMode) {
        self.completed_steps.insert(step_id);
        if mode == SaveMode::SaveAndContinue {
            self.current_step = steps::next_step_id(step_id).unwrap_or(step_id);
        }
    }

    /// Whether every required step has been completed.
    pub fn required_complete(&self) -> bool {
        (1..=REQUIRED_STEPS).all(|id| self.is_completed(id))
    }

    pub fn is_welcome(&self) -> bool {
        self.current_step == WELCOME_STEP
    }

    /// Write this progress into `record` for persistence.
    pub fn apply_to(&self, record: &mut OnboardingRecord) {
        record.current_step = self.current_step;
        record.completed_steps = self.completed_steps.clone();
    }
}
