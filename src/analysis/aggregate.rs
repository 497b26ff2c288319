//! Impact aggregation: per-entry net impact plus the dashboard and history
//! rollups built on top of it.

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Category, LifestyleItem, LogEntry};
use crate::log_warn;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::aggregate";

/// Reported and recomputed values closer than this are treated as equal.
pub const NET_IMPACT_TOLERANCE: f64 = 1e-12;

/// Entries counted by the dashboard's weekly figure.
pub const RECENT_WINDOW: usize = 7;

/// Sum of item impacts. Empty input yields 0.
pub fn net_impact(items: &[LifestyleItem]) -> f64 {
    items.iter().map(|item| item.impact).sum()
}

/// Always returns the sum of `items`; a diverging `reported` value is only logged.
pub fn reconcile(reported: f64, items: &[LifestyleItem]) -> f64 {
    let computed = net_impact(items);
    if (reported - computed).abs() > NET_IMPACT_TOLERANCE {
        log_warn!(
            "Model-reported net impact {reported:e} differs from item sum {computed:e}; using item sum"
        );
    }
    computed
}

/// Sum of `net_impact` over the `window` most recent entries by `date`.
pub fn recent_impact(entries: &[LogEntry], window: usize) -> f64 {
    let mut sorted: Vec<&LogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
        .into_iter()
        .take(window)
        .map(|entry| entry.net_impact)
        .sum()
}

/// Percentage points a milestone moves per year of weekly net impact.
pub const MILESTONE_IMPACT_SCALE: f64 = 5000.0;
pub const MILESTONE_MIN_PERCENT: u8 = 5;
pub const MILESTONE_MAX_PERCENT: u8 = 95;

/// Dashboard milestone probability in percent: `base` shifted by
/// `weekly_impact`, rounded and held within 5..=95.
pub fn milestone_probability(base: u8, weekly_impact: f64) -> u8 {
    let shifted = (f64::from(base) + weekly_impact * MILESTONE_IMPACT_SCALE).round();
    let shifted = if shifted.is_finite() {
        shifted
    } else {
        f64::from(base)
    };
    shifted.clamp(
        f64::from(MILESTONE_MIN_PERCENT),
        f64::from(MILESTONE_MAX_PERCENT),
    ) as u8
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub impact: f64,
    pub item_count: usize,
}

/// Per-category impact across all items of `entries`, in `Category::ALL` order.
/// Categories with no items are omitted.
pub fn category_totals(entries: &[LogEntry]) -> Vec<CategoryTotal> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            let (impact, item_count) = entries
                .iter()
                .flat_map(|entry| entry.items.iter())
                .filter(|item| item.category == *category)
                .fold((0.0, 0usize), |(sum, count), item| (sum + item.impact, count + 1));

            (item_count > 0).then_some(CategoryTotal {
                category: *category,
                impact,
                item_count,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySection {
    /// e.g. "October 2026"
    pub title: String,
    pub entries: Vec<LogEntry>,
}

/// Group entries by calendar month of `date`, newest month and entry first.
pub fn group_by_month(entries: &[LogEntry]) -> Vec<HistorySection> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut sections: Vec<HistorySection> = Vec::new();
    let mut current_key: Option<(i32, u32)> = None;

    for entry in sorted {
        let key = (entry.date.year(), entry.date.month());
        if current_key != Some(key) {
            current_key = Some(key);
            sections.push(HistorySection {
                title: entry.date.format("%B %Y").to_string(),
                entries: Vec::new(),
            });
        }
        if let Some(section) = sections.last_mut() {
            section.entries.push(entry);
        }
    }

    sections
}
