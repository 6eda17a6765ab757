//! Unified `Database` trait: single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;

/// A restaurant row. Only the archival flag matters to onboarding.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    /// Soft-deleted / archived.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Backend-agnostic database trait covering restaurants, onboarding records
/// and settings.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Restaurants ─────────────────────────────────────────────────

    /// Insert a new restaurant.
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<(), DatabaseError>;

    /// Get a restaurant by ID.
    async fn get_restaurant(&self, id: Uuid) -> Result<Option<Restaurant>, DatabaseError>;

    /// Set or clear the archived flag. Returns false if no such restaurant.
    async fn set_restaurant_deleted(&self, id: Uuid, deleted: bool)
    -> Result<bool, DatabaseError>;

    // ── Onboarding records ──────────────────────────────────────────

    /// Raw JSON text of a restaurant's onboarding record, unparsed.
    async fn get_onboarding_record(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<String>, DatabaseError>;

    /// Insert or replace a restaurant's onboarding record.
    async fn set_onboarding_record(
        &self,
        restaurant_id: Uuid,
        raw: &str,
    ) -> Result<(), DatabaseError>;

    // ── Settings ────────────────────────────────────────────────────

    /// Get a JSON setting for `scope` (typically a user or session id).
    async fn get_setting(
        &self,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Insert or update a JSON setting.
    async fn set_setting(
        &self,
        scope: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;
}
