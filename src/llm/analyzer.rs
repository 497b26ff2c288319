use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::client::ModelClient;
use super::gemini::GeminiClient;
use super::mock::MockClient;
use crate::analysis::{build_prompt, parse_response, reconcile};
use crate::error::AnalysisError;
use crate::models::LogEntry;
use crate::settings::AnalyzerSettings;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::analyzer";

/// Turns journal text into a `LogEntry` through a `ModelClient`.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn ModelClient>,
}

impl Analyzer {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Mock client when requested or when no API key is configured,
    /// Gemini otherwise.
    pub fn from_settings(settings: &AnalyzerSettings) -> Result<Self, AnalysisError> {
        if settings.mock_requested() {
            log_info!("Using canned model replies");
            return Ok(Self::new(Arc::new(MockClient::new())));
        }

        match settings.api_key() {
            Some(key) => Ok(Self::new(Arc::new(GeminiClient::new(settings, key)?))),
            None => {
                log_warn!(
                    "{} is not set; falling back to canned model replies",
                    settings.api_key_env
                );
                Ok(Self::new(Arc::new(MockClient::new())))
            }
        }
    }

    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    /// Analyze one day's text. `date` defaults to now. Nothing is persisted.
    pub async fn analyze(
        &self,
        content: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<LogEntry, AnalysisError> {
        let prompt = build_prompt(content);
        let reply = self.client.generate(&prompt).await?;
        let parsed = parse_response(&reply)?;

        let mut entry = LogEntry::new(content.to_string(), date.unwrap_or_else(Utc::now), parsed.items);
        entry.net_impact = reconcile(parsed.net_impact, &entry.items);

        log_info!(
            "Analyzed entry {} via {}: {} item(s), net {:e} years",
            entry.id,
            self.client.name(),
            entry.items.len(),
            entry.net_impact
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Prompt;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FixedReply(&'static str);

    #[async_trait]
    impl ModelClient for FixedReply {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, AnalysisError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct Unreachable;

    #[async_trait]
    impl ModelClient for Unreachable {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, AnalysisError> {
            Err(AnalysisError::Network("connection refused".into()))
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn mock_analysis_builds_entry() {
        let analyzer = Analyzer::new(Arc::new(MockClient::new()));
        let date = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        let entry = analyzer
            .analyze("Woke up at noon, first meal at 6:40 PM", Some(date))
            .await
            .unwrap();

        assert_eq!(entry.date, date);
        assert_eq!(entry.raw_content, "Woke up at noon, first meal at 6:40 PM");
        assert_eq!(entry.items.len(), 3);
        let sum: f64 = entry.items.iter().map(|i| i.impact).sum();
        assert!((entry.net_impact - sum).abs() < 1e-12);
    }

    #[tokio::test]
    async fn reported_net_impact_is_replaced_by_item_sum() {
        let analyzer = Analyzer::new(Arc::new(FixedReply(
            r#"{"items":[{"id":"a","description":"run","category":"exercise","impact":0.00002,"confidence":0.9}],"netImpact":5}"#,
        )));
        let entry = analyzer.analyze("ran", None).await.unwrap();
        assert!((entry.net_impact - 0.00002).abs() < 1e-12);
    }

    #[tokio::test]
    async fn reply_without_json_is_parse_error() {
        let analyzer = Analyzer::new(Arc::new(FixedReply("I cannot help with that.")));
        let err = analyzer.analyze("anything", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let analyzer = Analyzer::new(Arc::new(Unreachable));
        let err = analyzer.analyze("anything", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Network(_)));
    }

    #[test]
    fn mock_flag_selects_mock_client() {
        let settings = AnalyzerSettings {
            use_mock: true,
            ..AnalyzerSettings::default()
        };
        assert_eq!(Analyzer::from_settings(&settings).unwrap().client_name(), "mock");
    }

    #[test]
    fn missing_key_falls_back_to_mock() {
        let settings = AnalyzerSettings {
            api_key_env: "LONGEVITY_LOG_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..AnalyzerSettings::default()
        };
        assert_eq!(Analyzer::from_settings(&settings).unwrap().client_name(), "mock");
    }
}
