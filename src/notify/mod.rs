//! Host notifications, narrowed down to the few this crate reacts to.

use crate::models::TabId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ids arrive as strings or numbers depending on the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotifyId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NotifyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyId::Number(n) => write!(f, "{n}"),
            NotifyId::Text(s) => f.write_str(s),
        }
    }
}

/// One `(event, type, ids)` notification from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event: String,
    #[serde(rename = "unitType")]
    pub unit_type: String,
    #[serde(default)]
    pub ids: Vec<NotifyId>,
}

impl Notification {
    pub fn new(event: &str, unit_type: &str, ids: &[&str]) -> Self {
        Self {
            event: event.to_string(),
            unit_type: unit_type.to_string(),
            ids: ids.iter().map(|id| NotifyId::Text((*id).to_string())).collect(),
        }
    }

    fn is_tab(&self, event: &str) -> bool {
        self.event == event && self.unit_type == "tab"
    }

    /// The newly selected tab, for `select`/`tab` notifications only.
    pub fn selected_tab(&self) -> Option<String> {
        if !self.is_tab("select") {
            return None;
        }
        self.ids.first().map(ToString::to_string)
    }

    /// Tabs closed by a `close`/`tab` notification.
    pub fn closed_tabs(&self) -> Vec<TabId> {
        if !self.is_tab("close") {
            return Vec::new();
        }
        self.ids.iter().filter_map(|id| TabId::new(id.to_string())).collect()
    }
}
