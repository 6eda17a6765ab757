//! Onboarding wizard, the guided setup a new restaurant goes through before
//! going live.
//!
//! A fixed, ordered list of steps (personnel, payments, POS, QR stands,
//! reviews, messaging). Each step shows as completed, current, available or
//! locked in the sidebar. Active restaurants may do steps in any order;
//! archived ones only reopen steps that were saved before archival.

pub mod progress;
pub mod record;
pub mod session;
pub mod status;
pub mod steps;

pub use progress::{ProgressState, SaveMode};
pub use record::OnboardingRecord;
pub use session::OnboardingSession;
pub use status::{RestaurantStanding, SidebarEntry, StepStatus, resolve_step_status, sidebar};
pub use steps::{STEPS, Step, StepKind};
