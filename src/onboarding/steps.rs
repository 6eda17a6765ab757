//! Static onboarding step catalog.

use serde::{Deserialize, Serialize};

/// The `currentStep` sentinel for the welcome screen shown before step 1.
pub const WELCOME_STEP: u8 = 0;

/// Steps `1..=REQUIRED_STEPS` must be completed before going live.
pub const REQUIRED_STEPS: u8 = 3;

/// What a step collects. Also decides which record sub-object backs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Personnel,
    Payments,
    Pos,
    QrStand,
    GoogleReview,
    Messaging,
}

impl StepKind {
    /// Key of the sub-object in the persisted onboarding record that holds
    /// this step's form data, if the step has a historical domain.
    pub fn record_key(&self) -> Option<&'static str> {
        match self {
            Self::Personnel => Some("personnelData"),
            Self::Payments => Some("stripeData"),
            Self::Pos => Some("posData"),
            Self::QrStand => Some("qrStandData"),
            Self::GoogleReview => Some("googleReviewData"),
            Self::Messaging => None,
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personnel => "personnel",
            Self::Payments => "payments",
            Self::Pos => "pos",
            Self::QrStand => "qr_stand",
            Self::GoogleReview => "google_review",
            Self::Messaging => "messaging",
        };
        write!(f, "{s}")
    }
}

/// Static step descriptor. `name` and `description` are translation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: u8,
    pub kind: StepKind,
    pub name: &'static str,
    pub description: &'static str,
}

impl Step {
    pub fn is_required(&self) -> bool {
        self.id <= REQUIRED_STEPS
    }

    pub fn record_key(&self) -> Option<&'static str> {
        self.kind.record_key()
    }
}

/// All onboarding steps, in display order. Ids are `1..=STEPS.len()`.
pub static STEPS: [Step; 6] = [
    Step {
        id: 1,
        kind: StepKind::Personnel,
        name: "onboarding.steps.personnel.name",
        description: "onboarding.steps.personnel.description",
    },
    Step {
        id: 2,
        kind: StepKind::Payments,
        name: "onboarding.steps.payments.name",
        description: "onboarding.steps.payments.description",
    },
    Step {
        id: 3,
        kind: StepKind::Pos,
        name: "onboarding.steps.pos.name",
        description: "onboarding.steps.pos.description",
    },
    Step {
        id: 4,
        kind: StepKind::QrStand,
        name: "onboarding.steps.qr_stand.name",
        description: "onboarding.steps.qr_stand.description",
    },
    Step {
        id: 5,
        kind: StepKind::GoogleReview,
        name: "onboarding.steps.google_review.name",
        description: "onboarding.steps.google_review.description",
    },
    Step {
        id: 6,
        kind: StepKind::Messaging,
        name: "onboarding.steps.messaging.name",
        description: "onboarding.steps.messaging.description",
    },
];

/// Look up a step by id. `None` for the welcome sentinel and out-of-range ids.
pub fn step(id: u8) -> Option<&'static Step> {
    STEPS.iter().find(|s| s.id == id)
}

/// The step after `id`, if any.
pub fn next_step_id(id: u8) -> Option<u8> {
    let next = id.checked_add(1)?;
    step(next).map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_contiguous_from_one() {
        for (idx, s) in STEPS.iter().enumerate() {
            assert_eq!(s.id as usize, idx + 1, "step {} out of order", s.kind);
        }
        assert_eq!(STEPS.len(), 6);
    }

    #[test]
    fn first_three_steps_are_required() {
        let required: Vec<u8> = STEPS.iter().filter(|s| s.is_required()).map(|s| s.id).collect();
        assert_eq!(required, vec![1, 2, 3]);
    }

    #[test]
    fn lookup_rejects_welcome_and_out_of_range() {
        assert!(step(WELCOME_STEP).is_none());
        assert!(step(7).is_none());
        assert_eq!(step(3).unwrap().kind, StepKind::Pos);
    }

    #[test]
    fn next_step_stops_at_the_end() {
        assert_eq!(next_step_id(WELCOME_STEP), Some(1));
        assert_eq!(next_step_id(5), Some(6));
        assert_eq!(next_step_id(6), None);
        assert_eq!(next_step_id(u8::MAX), None);
    }

    #[test]
    fn record_keys_match_persisted_layout() {
        assert_eq!(step(1).unwrap().record_key(), Some("personnelData"));
        assert_eq!(step(2).unwrap().record_key(), Some("stripeData"));
        assert_eq!(step(3).unwrap().record_key(), Some("posData"));
        assert_eq!(step(4).unwrap().record_key(), Some("qrStandData"));
        assert_eq!(step(5).unwrap().record_key(), Some("googleReviewData"));
        assert_eq!(step(6).unwrap().record_key(), None);
    }

    #[test]
    fn display_matches_serde() {
        for s in &STEPS {
            let display = format!("{}", s.kind);
            let json = serde_json::to_string(&s.kind).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn translation_keys_follow_kind() {
        for s in &STEPS {
            assert_eq!(s.name, format!("onboarding.steps.{}.name", s.kind));
            assert_eq!(s.description, format!("onboarding.steps.{}.description", s.kind));
        }
    }
}
