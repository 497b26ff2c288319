//! Lifestyle factor data models.
//!
//! `Category` and `InteractionEffect` are closed enums with a fallback
//! variant so unexpected labels from the model never fail deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Sleep,
    Diet,
    Exercise,
    Stress,
    Social,
    Habits,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sleep,
        Category::Diet,
        Category::Exercise,
        Category::Stress,
        Category::Social,
        Category::Habits,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sleep => "sleep",
            Category::Diet => "diet",
            Category::Exercise => "exercise",
            Category::Stress => "stress",
            Category::Social => "social",
            Category::Habits => "habits",
            Category::Other => "other",
        }
    }

    /// Case-insensitive lookup. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sleep" => Category::Sleep,
            "diet" | "nutrition" => Category::Diet,
            "exercise" => Category::Exercise,
            "stress" => Category::Stress,
            "social" => Category::Social,
            "habits" | "substances" => Category::Habits,
            _ => Category::Other,
        }
    }

    /// Display title, e.g. "Sleep".
    pub fn title(&self) -> &'static str {
        match self {
            Category::Sleep => "Sleep",
            Category::Diet => "Diet",
            Category::Exercise => "Exercise",
            Category::Stress => "Stress",
            Category::Social => "Social",
            Category::Habits => "Habits",
            Category::Other => "Other",
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InteractionEffect {
    Enhances,
    Diminishes,
    Neutralizes,
    Unknown,
}

impl InteractionEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionEffect::Enhances => "enhances",
            InteractionEffect::Diminishes => "diminishes",
            InteractionEffect::Neutralizes => "neutralizes",
            InteractionEffect::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "enhances" => InteractionEffect::Enhances,
            "diminishes" => InteractionEffect::Diminishes,
            "neutralizes" | "neutralises" => InteractionEffect::Neutralizes,
            _ => InteractionEffect::Unknown,
        }
    }
}

impl From<String> for InteractionEffect {
    fn from(value: String) -> Self {
        InteractionEffect::from_label(&value)
    }
}

/// Effect one factor has on another factor of the same entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Lookup key into the owning entry's `items`, not an owning reference.
    pub item_id: String,
    pub effect: InteractionEffect,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleItem {
    pub id: String,
    pub description: String,
    pub category: Category,
    /// Fractional years; negative shortens the estimate.
    pub impact: f64,
    pub confidence: f64,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}
