//! resto-onboard: onboarding progress model for the restaurant admin.

pub mod config;
pub mod error;
pub mod navigation;
pub mod onboarding;
pub mod store;
pub mod ui_state;
