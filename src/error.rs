//! Error types for resto-onboard.

use uuid::Uuid;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A persisted onboarding record could not be read.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Malformed onboarding record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Onboarding record is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

/// Onboarding session errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Unknown onboarding step {0}")]
    UnknownStep(u8),

    #[error("Restaurant {0} not found")]
    RestaurantNotFound(Uuid),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
