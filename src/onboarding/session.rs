//! OnboardingSession: one open onboarding flow for one restaurant.
//!
//! Loads the restaurant's archival flag and persisted record, derives the
//! sidebar, and owns the "persist first, then mark completed" ordering for
//! step saves.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::error::{DatabaseError, OnboardingError, Result};
use crate::store::Database;

use super::progress::{ProgressState, SaveMode};
use super::record::OnboardingRecord;
use super::status::{self, RestaurantStanding, SidebarEntry, StepStatus};
use super::steps;

/// An open onboarding flow. Dropping it discards the in-memory progress;
/// everything durable was already written by [`OnboardingSession::save_step`].
pub struct OnboardingSession {
    db: Arc<dyn Database>,
    restaurant_id: Uuid,
    standing: RestaurantStanding,
    record: OnboardingRecord,
    progress: ProgressState,
    /// False while `record` is a placeholder for a record that could not be
    /// read. The next save re-reads before writing.
    record_loaded: bool,
}

impl OnboardingSession {
    /// Open the flow for `restaurant_id`.
    ///
    /// Progress is restored from the persisted record. A storage failure
    /// fails the open for an active restaurant. For an archived one the
    /// history is treated as missing, so unsaved steps show as locked.
    pub async fn open(db: Arc<dyn Database>, restaurant_id: Uuid) -> Result<Self> {
        let restaurant = db
            .get_restaurant(restaurant_id)
            .await?
            .ok_or(OnboardingError::RestaurantNotFound(restaurant_id))?;

        let (record, record_loaded) = if restaurant.deleted {
            match status::load_history(db.as_ref(), restaurant_id).await {
                Ok(record) => (record, true),
                Err(e) => {
                    tracing::warn!(%restaurant_id, "Onboarding history unavailable: {}", e);
                    (None, false)
                }
            }
        } else {
            (status::load_history(db.as_ref(), restaurant_id).await?, true)
        };

        let progress = ProgressState::from_record(record.as_ref());
        let standing = if restaurant.deleted {
            RestaurantStanding::Archived {
                history: record.clone(),
            }
        } else {
            RestaurantStanding::Active
        };

        tracing::info!(
            %restaurant_id,
            archived = restaurant.deleted,
            current_step = progress.current_step,
            completed = progress.completed_steps.len(),
            "Onboarding session opened"
        );

        Ok(Self {
            db,
            restaurant_id,
            standing,
            record: record.unwrap_or_default(),
            progress,
            record_loaded,
        })
    }

    pub fn restaurant_id(&self) -> Uuid {
        self.restaurant_id
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn standing(&self) -> &RestaurantStanding {
        &self.standing
    }

    /// The record as last persisted (or an empty one if nothing was readable).
    pub fn record(&self) -> &OnboardingRecord {
        &self.record
    }

    pub fn status(&self, step_id: u8) -> StepStatus {
        status::resolve_step_status(step_id, &self.progress, &self.standing)
    }

    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        status::sidebar(&self.progress, &self.standing)
    }

    /// Navigate to `step_id`. Nothing is persisted until the next save.
    pub fn select_step(&mut self, step_id: u8) {
        tracing::debug!(restaurant_id = %self.restaurant_id, step = step_id, "Step selected");
        self.progress.select_step(step_id);
    }

    /// Save a step's form data and, once the write succeeds, mark it completed.
    ///
    /// The data lands under the step's record key (or under the step name for
    /// steps without one). The record is written once with the data and the
    /// new progress together; if that write fails, the error is returned and
    /// neither the in-memory record nor the progress changes. If the record
    /// could not be read at open, it is read again first so the write never
    /// drops earlier sections.
    pub async fn save_step(&mut self, step_id: u8, data: Value, mode: SaveMode) -> Result<()> {
        let step = steps::step(step_id).ok_or(OnboardingError::UnknownStep(step_id))?;
        if !self.record_loaded {
            let stored = status::load_history(self.db.as_ref(), self.restaurant_id).await?;
            self.adopt_stored(stored);
        }
        let key = step
            .record_key()
            .map(str::to_string)
            .unwrap_or_else(|| step.kind.to_string());

        let mut record = self.record.clone();
        record.set_section(key, data);

        let mut progress = self.progress.clone();
        progress.complete_step(step_id, mode);
        progress.apply_to(&mut record);

        let raw = record
            .to_json_string()
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        if let Err(e) = self
            .db
            .set_onboarding_record(self.restaurant_id, &raw)
            .await
        {
            tracing::warn!(
                restaurant_id = %self.restaurant_id,
                step = step_id,
                "Failed to save onboarding step: {}",
                e
            );
            return Err(e.into());
        }

        if let RestaurantStanding::Archived { history } = &mut self.standing {
            *history = Some(record.clone());
        }
        self.record = record;
        self.progress = progress;

        tracing::info!(
            restaurant_id = %self.restaurant_id,
            step = step_id,
            kind = %step.kind,
            current_step = self.progress.current_step,
            "Onboarding step completed"
        );
        Ok(())
    }

    /// Re-read the archival flag and history, e.g. after the restaurant was
    /// archived or restored elsewhere. Progress is left as is, apart from
    /// picking up a record that could not be read at open.
    pub async fn refresh_standing(&mut self) -> Result<()> {
        let restaurant = self
            .db
            .get_restaurant(self.restaurant_id)
            .await?
            .ok_or(OnboardingError::RestaurantNotFound(self.restaurant_id))?;

        let stored = match status::load_history(self.db.as_ref(), self.restaurant_id).await {
            Ok(stored) => stored,
            Err(e) if restaurant.deleted => {
                tracing::warn!(
                    restaurant_id = %self.restaurant_id,
                    "Onboarding history unavailable: {}",
                    e
                );
                self.standing = RestaurantStanding::Archived { history: None };
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.standing = if restaurant.deleted {
            RestaurantStanding::Archived {
                history: stored.clone(),
            }
        } else {
            RestaurantStanding::Active
        };
        if !self.record_loaded {
            self.adopt_stored(stored);
        }
        Ok(())
    }

    /// Take over a record read after open. Sections come from storage,
    /// completed steps are merged, and the current step stays where the
    /// user navigated.
    fn adopt_stored(&mut self, stored: Option<OnboardingRecord>) {
        let restored = ProgressState::from_record(stored.as_ref());
        self.progress.completed_steps.extend(restored.completed_steps);
        if let RestaurantStanding::Archived { history } = &mut self.standing {
            *history = stored.clone();
        }
        self.record = stored.unwrap_or_default();
        self.record_loaded = true;
        tracing::debug!(
            restaurant_id = %self.restaurant_id,
            completed = self.progress.completed_steps.len(),
            "Late onboarding record adopted"
        );
    }

    /// Whether all required steps are done and the page may leave onboarding.
    pub fn required_complete(&self) -> bool {
        self.progress.required_complete()
    }
}
