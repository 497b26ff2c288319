//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::client::ModelClient;
use crate::analysis::{GenerationConfig, Prompt};
use crate::error::AnalysisError;
use crate::settings::AnalyzerSettings;
use crate::{log_debug, log_error};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::llm";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(settings: &AnalyzerSettings, api_key: String) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            api_key,
            generation: settings.generation.clone(),
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AnalysisError> {
        let body = prompt.to_request(&self.generation);
        log_debug!("POST {} ({} prompt chars)", self.api_url, prompt.user.len());

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log_error!("Model endpoint returned {status}");
            return Err(AnalysisError::Network(format!(
                "endpoint returned {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let payload: GenerateResponse = response.json().await?;
        payload
            .first_text()
            .ok_or_else(|| AnalysisError::Network("response contained no candidate text".into()))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
