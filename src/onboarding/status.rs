//! Step status resolution for the onboarding sidebar.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::Database;

use super::progress::ProgressState;
use super::record::OnboardingRecord;
use super::steps::{self, STEPS};

/// Display status of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Available,
    Locked,
}

impl StepStatus {
    /// Whether the sidebar button for this step is clickable.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Locked)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Current => "current",
            Self::Available => "available",
            Self::Locked => "locked",
        };
        write!(f, "{s}")
    }
}

/// Whether a restaurant is live or archived, with the archived
/// restaurant's historical record if one could be read.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RestaurantStanding {
    #[default]
    Active,
    Archived { history: Option<OnboardingRecord> },
}

impl RestaurantStanding {
    pub fn is_archived(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }
}

/// Resolve the display status of `step_id`.
///
/// Priority: completed, then current, then (archived only) whatever the
/// historical record shows, else available. Archived restaurants without
/// readable history lock every step that is neither completed nor current.
/// Unknown step ids resolve to `Locked`.
pub fn resolve_step_status(
    step_id: u8,
    progress: &ProgressState,
    standing: &RestaurantStanding,
) -> StepStatus {
    if steps::step(step_id).is_none() {
        return StepStatus::Locked;
    }
    if progress.is_completed(step_id) {
        return StepStatus::Completed;
    }
    if progress.current_step == step_id {
        return StepStatus::Current;
    }
    match standing {
        RestaurantStanding::Active => StepStatus::Available,
        RestaurantStanding::Archived { history } => match history {
            Some(record) if record.has_data_for(step_id) => StepStatus::Available,
            _ => StepStatus::Locked,
        },
    }
}

/// One row of the onboarding sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub status: StepStatus,
    pub selectable: bool,
}

/// Resolve every catalog step, in display order.
pub fn sidebar(progress: &ProgressState, standing: &RestaurantStanding) -> Vec<SidebarEntry> {
    STEPS
        .iter()
        .map(|step| {
            let status = resolve_step_status(step.id, progress, standing);
            SidebarEntry {
                id: step.id,
                name: step.name,
                description: step.description,
                required: step.is_required(),
                status,
                selectable: status.is_selectable(),
            }
        })
        .collect()
}

/// Read a restaurant's stored onboarding record.
///
/// Storage failures are returned to the caller. An unparsable record is
/// logged and treated as absent, which locks every unsaved step of an
/// archived restaurant and lets the next save replace it.
pub async fn load_history(
    db: &dyn Database,
    restaurant_id: Uuid,
) -> Result<Option<OnboardingRecord>, DatabaseError> {
    let Some(raw) = db.get_onboarding_record(restaurant_id).await? else {
        return Ok(None);
    };
    match OnboardingRecord::parse(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!(%restaurant_id, "Ignoring unreadable onboarding history: {}", e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::*;

    fn progress(current: u8, completed: &[u8]) -> ProgressState {
        ProgressState {
            current_step: current,
            completed_steps: completed.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn archived(history: Option<serde_json::Value>) -> RestaurantStanding {
        RestaurantStanding::Archived {
            history: history.map(|v| OnboardingRecord::from_value(v).unwrap()),
        }
    }

    #[test]
    fn completed_wins_over_everything() {
        let p = progress(2, &[2, 5]);
        for standing in [RestaurantStanding::Active, archived(None)] {
            assert_eq!(resolve_step_status(2, &p, &standing), StepStatus::Completed);
            assert_eq!(resolve_step_status(5, &p, &standing), StepStatus::Completed);
        }
    }

    #[test]
    fn current_step_resolves_current() {
        let p = progress(4, &[]);
        assert_eq!(
            resolve_step_status(4, &p, &RestaurantStanding::Active),
            StepStatus::Current
        );
        assert_eq!(resolve_step_status(4, &p, &archived(None)), StepStatus::Current);
    }

    #[test]
    fn active_restaurant_leaves_everything_else_available() {
        let p = progress(1, &[3]);
        for id in [2, 4, 5, 6] {
            assert_eq!(
                resolve_step_status(id, &p, &RestaurantStanding::Active),
                StepStatus::Available
            );
        }
    }

    #[test]
    fn archived_without_history_locks() {
        let p = progress(0, &[]);
        for step in &STEPS {
            assert_eq!(resolve_step_status(step.id, &p, &archived(None)), StepStatus::Locked);
        }
    }

    #[test]
    fn archived_history_unlocks_saved_domains_only() {
        let standing = archived(Some(json!({"posData": {"provider": "square"}})));
        let p = progress(0, &[]);
        assert_eq!(resolve_step_status(3, &p, &standing), StepStatus::Available);
        assert_eq!(resolve_step_status(4, &p, &standing), StepStatus::Locked);
    }

    #[test]
    fn fresh_active_restaurant() {
        let p = progress(1, &[]);
        let s = RestaurantStanding::Active;
        assert_eq!(resolve_step_status(1, &p, &s), StepStatus::Current);
        assert_eq!(resolve_step_status(2, &p, &s), StepStatus::Available);
        assert_eq!(resolve_step_status(6, &p, &s), StepStatus::Available);
    }

    #[test]
    fn archived_with_personnel_history() {
        let standing = archived(Some(json!({"personnelData": {"staff": [{"name": "Ana"}]}})));
        let p = progress(0, &[]);
        assert_eq!(resolve_step_status(1, &p, &standing), StepStatus::Available);
        assert_eq!(resolve_step_status(2, &p, &standing), StepStatus::Locked);
        assert_eq!(resolve_step_status(3, &p, &standing), StepStatus::Locked);
    }

    #[test]
    fn partially_completed_active_flow() {
        let p = progress(3, &[1, 2]);
        let s = RestaurantStanding::Active;
        assert_eq!(resolve_step_status(1, &p, &s), StepStatus::Completed);
        assert_eq!(resolve_step_status(2, &p, &s), StepStatus::Completed);
        assert_eq!(resolve_step_status(3, &p, &s), StepStatus::Current);
        assert_eq!(resolve_step_status(4, &p, &s), StepStatus::Available);
    }

    #[test]
    fn unknown_ids_are_locked() {
        let p = progress(7, &[7]);
        assert_eq!(
            resolve_step_status(7, &p, &RestaurantStanding::Active),
            StepStatus::Locked
        );
        assert_eq!(
            resolve_step_status(0, &p, &RestaurantStanding::Active),
            StepStatus::Locked
        );
    }

    #[test]
    fn sidebar_lists_every_step_in_order() {
        let entries = sidebar(&progress(2, &[1]), &RestaurantStanding::Active);
        let ids: Vec<u8> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(entries[0].status, StepStatus::Completed);
        assert_eq!(entries[1].status, StepStatus::Current);
        assert!(entries[2].required);
        assert!(!entries[3].required);
        assert!(entries.iter().all(|e| e.selectable));
    }

    #[test]
    fn sidebar_disables_locked_steps() {
        let entries = sidebar(&progress(0, &[]), &archived(None));
        assert!(entries.iter().all(|e| !e.selectable));
    }

    #[test]
    fn status_display_matches_serde() {
        for status in [
            StepStatus::Completed,
            StepStatus::Current,
            StepStatus::Available,
            StepStatus::Locked,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }
}
