//! Per-user UI session state (sidebar collapse, expanded menu groups).
//!
//! State lives in an explicit [`UiSession`] handed to whoever renders the
//! layout. Persistence goes through the injected [`PreferenceStore`] port.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DatabaseError;
use crate::store::Database;

/// Preference keys.
pub mod keys {
    pub const SIDEBAR_COLLAPSED: &str = "ui.sidebar_collapsed";
    pub const EXPANDED_MENUS: &str = "ui.expanded_menus";
}

/// Key/value persistence port for UI preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn save(&self, key: &str, value: &Value) -> Result<(), DatabaseError>;

    async fn load(&self, key: &str) -> Result<Option<Value>, DatabaseError>;
}

/// [`PreferenceStore`] over the `settings` table, scoped to one user.
pub struct SettingsPreferenceStore {
    db: Arc<dyn Database>,
    scope: String,
}

impl SettingsPreferenceStore {
    pub fn new(db: Arc<dyn Database>, scope: impl Into<String>) -> Self {
        Self {
            db,
            scope: scope.into(),
        }
    }
}

#[async_trait]
impl PreferenceStore for SettingsPreferenceStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), DatabaseError> {
        self.db.set_setting(&self.scope, key, value).await
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, DatabaseError> {
        self.db.get_setting(&self.scope, key).await
    }
}

/// Layout state for one signed-in user.
pub struct UiSession {
    store: Arc<dyn PreferenceStore>,
    sidebar_collapsed: bool,
    expanded_menus: BTreeSet<String>,
}

impl UiSession {
    /// Restore saved preferences. Unreadable values fall back to defaults
    /// (sidebar expanded, no menu groups open).
    pub async fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let sidebar_collapsed = match store.load(keys::SIDEBAR_COLLAPSED).await {
            Ok(Some(v)) => v.as_bool().unwrap_or(false),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to load sidebar preference: {}", e);
                false
            }
        };

        let expanded_menus = match store.load(keys::EXPANDED_MENUS).await {
            Ok(Some(Value::Array(items))) => items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            Ok(_) => BTreeSet::new(),
            Err(e) => {
                tracing::warn!("Failed to load expanded menus: {}", e);
                BTreeSet::new()
            }
        };

        Self {
            store,
            sidebar_collapsed,
            expanded_menus,
        }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn is_menu_expanded(&self, key: &str) -> bool {
        self.expanded_menus.contains(key)
    }

    pub fn expanded_menus(&self) -> impl Iterator<Item = &str> {
        self.expanded_menus.iter().map(String::as_str)
    }

    /// Persist and apply the sidebar state. On a failed save the in-memory
    /// state is left unchanged.
    pub async fn set_sidebar_collapsed(&mut self, collapsed: bool) -> Result<(), DatabaseError> {
        self.store
            .save(keys::SIDEBAR_COLLAPSED, &Value::Bool(collapsed))
            .await?;
        self.sidebar_collapsed = collapsed;
        Ok(())
    }

    /// Flip the sidebar and return the new collapsed state.
    pub async fn toggle_sidebar(&mut self) -> Result<bool, DatabaseError> {
        let collapsed = !self.sidebar_collapsed;
        self.set_sidebar_collapsed(collapsed).await?;
        Ok(collapsed)
    }

    /// Open or close a menu group and return whether it is now expanded.
    pub async fn toggle_menu(&mut self, key: &str) -> Result<bool, DatabaseError> {
        let mut menus = self.expanded_menus.clone();
        let expanded = if menus.remove(key) {
            false
        } else {
            menus.insert(key.to_string());
            true
        };

        let value = Value::Array(menus.iter().cloned().map(Value::String).collect());
        self.store.save(keys::EXPANDED_MENUS, &value).await?;
        self.expanded_menus = menus;
        Ok(expanded)
    }
}
