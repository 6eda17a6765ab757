//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{Database, Restaurant};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn row_to_restaurant(row: &libsql::Row) -> Result<Restaurant, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("restaurant id: {e}")))?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DatabaseError::Serialization(format!("restaurant id {id_str}: {e}")))?;
    let name: String = row
        .get(1)
        .map_err(|e| DatabaseError::Query(format!("restaurant name: {e}")))?;
    let deleted: i64 = row.get(2).unwrap_or(0);
    let created_at: String = row.get(3).unwrap_or_default();
    let updated_at: String = row.get(4).unwrap_or_default();

    Ok(Restaurant {
        id,
        name,
        deleted: deleted != 0,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Restaurants ─────────────────────────────────────────────────

    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<(), DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO restaurants (id, name, deleted, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                restaurant.id.to_string(),
                restaurant.name.as_str(),
                restaurant.deleted as i64,
                restaurant.created_at.to_rfc3339(),
                restaurant.updated_at.to_rfc3339()
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_restaurant: {e}")))?;
        debug!(restaurant_id = %restaurant.id, "Restaurant inserted");
        Ok(())
    }

    async fn get_restaurant(&self, id: Uuid) -> Result<Option<Restaurant>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT id, name, deleted, created_at, updated_at FROM restaurants WHERE id = ?1",
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_restaurant: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_restaurant(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_restaurant: {e}"))),
        }
    }

    async fn set_restaurant_deleted(
        &self,
        id: Uuid,
        deleted: bool,
    ) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let count = conn
            .execute(
                "UPDATE restaurants SET deleted = ?1, updated_at = ?2 WHERE id = ?3",
                params![deleted as i64, now, id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("set_restaurant_deleted: {e}")))?;
        debug!(restaurant_id = %id, deleted, "Restaurant archival flag updated");
        Ok(count > 0)
    }

    // ── Onboarding records ──────────────────────────────────────────

    async fn get_onboarding_record(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT data FROM onboarding_records WHERE restaurant_id = ?1",
                params![restaurant_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_onboarding_record: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let data: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_onboarding_record: {e}")))?;
                Ok(Some(data))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_onboarding_record: {e}"))),
        }
    }

    async fn set_onboarding_record(
        &self,
        restaurant_id: Uuid,
        raw: &str,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO onboarding_records (restaurant_id, data, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (restaurant_id) DO UPDATE SET data = ?2, updated_at = ?3",
            params![restaurant_id.to_string(), raw, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_onboarding_record: {e}")))?;
        debug!(%restaurant_id, "Onboarding record saved");
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    async fn get_setting(
        &self,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE scope = ?1 AND key = ?2",
                params![scope, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: serde_json::Value =
                    serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_setting: {e}"))),
        }
    }

    async fn set_setting(
        &self,
        scope: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO settings (scope, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (scope, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![scope, key, value_str, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_setting: {e}")))?;

        Ok(())
    }
}
