//! Canned model replies for development and tests. No network access.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};

use super::client::ModelClient;
use crate::analysis::Prompt;
use crate::error::AnalysisError;
use crate::log_debug;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::llm";

static SOCIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)spent.*time.*friend|social|hang.*out|meet.*friend")
        .expect("social pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct MockClient {
    latency: Option<Duration>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply, to exercise loading states.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

fn social_reply() -> Value {
    json!({
        "items": [{
            "id": "social-1",
            "description": "Spent quality time with friends",
            "category": "social",
            "impact": 0.0000029,
            "confidence": 0.85,
            "interactions": [],
            "recommendations": [
                "Continue nurturing social connections regularly",
                "Try to engage in meaningful conversations during social gatherings"
            ],
            "sources": [
                "Holt-Lunstad, J. et al. (2010). Social Relationships and Mortality Risk: A Meta-analytic Review"
            ]
        }],
        "netImpact": 0.0000029
    })
}

fn default_reply() -> Value {
    json!({
        "items": [
            {
                "id": "sleep-1",
                "description": "Waking up at 12:00 PM",
                "category": "sleep",
                "impact": -0.0000057,
                "confidence": 0.85,
                "interactions": [{
                    "itemId": "diet-1",
                    "effect": "enhances",
                    "description": "Late wake-up time leads to delayed first meal, extending fasting period"
                }],
                "recommendations": [
                    "Gradually shift wake-up time earlier by 15 minutes each day",
                    "Expose yourself to natural light immediately upon waking"
                ],
                "sources": ["Walker, M. (2017). Why We Sleep: The New Science of Sleep and Dreams"]
            },
            {
                "id": "diet-1",
                "description": "First meal at 6:40 PM (extended fasting)",
                "category": "diet",
                "impact": 0.0000038,
                "confidence": 0.7,
                "interactions": [],
                "recommendations": [
                    "Maintain time-restricted eating but consider a slightly earlier eating window",
                    "Ensure adequate nutrition during eating window"
                ],
                "sources": ["Longo, V. D., & Panda, S. (2016). Fasting, circadian rhythms, and time-restricted feeding in healthy lifespan"]
            },
            {
                "id": "hydration-1",
                "description": "Drinking only half a glass of water daily",
                "category": "diet",
                "impact": -0.0000057,
                "confidence": 0.9,
                "interactions": [],
                "recommendations": [
                    "Gradually increase water intake to at least 8 glasses per day",
                    "Set reminders to drink water throughout your waking hours"
                ],
                "sources": ["National Academies of Sciences, Engineering, and Medicine. (2004). Dietary Reference Intakes for Water, Potassium, Sodium, Chloride, and Sulfate"]
            }
        ],
        "netImpact": -0.0000076
    })
}

/// Reply text for a journal entry, shaped like a real model answer.
pub fn canned_reply(journal_text: &str) -> String {
    let payload = if SOCIAL_RE.is_match(journal_text) {
        social_reply()
    } else {
        default_reply()
    };
    let body = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    format!("Here is the analysis of your day.\n\n```json\n{body}\n```\n")
}

#[async_trait]
impl ModelClient for MockClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AnalysisError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        log_debug!("Serving canned reply");
        Ok(canned_reply(&prompt.user))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
