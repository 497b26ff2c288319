//! Journal entry data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::LifestyleItem;
use crate::analysis::aggregate::net_impact;

/// One day's analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    /// The day the entry describes; may differ from `created_at`.
    pub date: DateTime<Utc>,
    pub raw_content: String,
    #[serde(default)]
    pub items: Vec<LifestyleItem>,
    #[serde(default)]
    pub net_impact: f64,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// Build a fresh entry with a generated id. `net_impact` is derived from `items`.
    pub fn new(raw_content: String, date: DateTime<Utc>, items: Vec<LifestyleItem>) -> Self {
        let mut entry = Self {
            id: new_entry_id(),
            date,
            raw_content,
            items,
            net_impact: 0.0,
            created_at: Utc::now(),
        };
        entry.recompute_net_impact();
        entry
    }

    pub fn recompute_net_impact(&mut self) {
        self.net_impact = net_impact(&self.items);
    }

    /// Resolve an interaction's `item_id` against this entry's items.
    pub fn interaction_target(&self, item_id: &str) -> Option<&LifestyleItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

pub fn new_entry_id() -> String {
    format!("log_{}", Uuid::new_v4())
}
