//! Admin navigation menu and capability-based filtering.
//!
//! The menu is a static declarative tree. What a user sees is derived by
//! [`filter_by_capability_set`] from the capabilities granted to their role;
//! nothing here reads ambient session state.

use std::collections::BTreeSet;

use serde::Serialize;

/// Capability codes granted to users. A menu item without a required
/// capability is visible to everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<String>);

impl CapabilitySet {
    pub fn has(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Parse a comma-separated capability list, ignoring blanks.
    pub fn from_csv(csv: &str) -> Self {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Static menu entry. `label` is a translation key.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub requires: Option<&'static str>,
    pub children: &'static [MenuItem],
}

/// A menu entry the user is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleMenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisibleMenuItem>,
}

const fn leaf(
    key: &'static str,
    label: &'static str,
    path: &'static str,
    requires: Option<&'static str>,
) -> MenuItem {
    MenuItem {
        key,
        label,
        path,
        requires,
        children: &[],
    }
}

/// The admin application's navigation menu.
pub static ADMIN_MENU: &[MenuItem] = &[
    leaf("dashboard", "menu.dashboard", "/dashboard", None),
    MenuItem {
        key: "restaurants",
        label: "menu.restaurants",
        path: "/restaurants",
        requires: None,
        children: &[
            leaf(
                "restaurant_list",
                "menu.restaurants.list",
                "/restaurants",
                Some("restaurants.read"),
            ),
            leaf(
                "onboarding",
                "menu.restaurants.onboarding",
                "/restaurants/onboarding",
                Some("onboarding.manage"),
            ),
            leaf(
                "tables",
                "menu.restaurants.tables",
                "/restaurants/tables",
                Some("tables.manage"),
            ),
        ],
    },
    leaf("staff", "menu.staff", "/staff", Some("staff.manage")),
    leaf("orders", "menu.orders", "/orders", Some("orders.read")),
    MenuItem {
        key: "integrations",
        label: "menu.integrations",
        path: "/integrations",
        requires: Some("integrations.read"),
        children: &[
            leaf("pos", "menu.integrations.pos", "/integrations/pos", Some("pos.manage")),
            leaf(
                "payments",
                "menu.integrations.payments",
                "/integrations/payments",
                Some("payments.manage"),
            ),
        ],
    },
    leaf("settings", "menu.settings", "/settings", None),
];

/// Keep the items `capabilities` grants access to.
///
/// An item is visible when its own requirement (if any) is met. A group is
/// additionally dropped when none of its children survive, so users never
/// see an empty section.
pub fn filter_by_capability_set(
    items: &[MenuItem],
    capabilities: &CapabilitySet,
) -> Vec<VisibleMenuItem> {
    items
        .iter()
        .filter(|item| item.requires.is_none_or(|code| capabilities.has(code)))
        .filter_map(|item| {
            let children = filter_by_capability_set(item.children, capabilities);
            if !item.children.is_empty() && children.is_empty() {
                return None;
            }
            Some(VisibleMenuItem {
                key: item.key,
                label: item.label,
                path: item.path,
                children,
            })
        })
        .collect()
}
