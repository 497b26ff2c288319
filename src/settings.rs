use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::analysis::GenerationConfig;
use crate::log_warn;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::settings";

/// Forces the canned model client when set to `1` or `true`.
pub const MOCK_ENV_VAR: &str = "LONGEVITY_LOG_MOCK";

const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub api_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub generation: GenerationConfig,
    pub request_timeout_secs: u64,
    pub use_mock: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key_env: "GEMINI_API_KEY".into(),
            generation: GenerationConfig::default(),
            request_timeout_secs: 60,
            use_mock: false,
        }
    }
}

impl AnalyzerSettings {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// `use_mock` or the `LONGEVITY_LOG_MOCK` override.
    pub fn mock_requested(&self) -> bool {
        let env_override = std::env::var(MOCK_ENV_VAR)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        self.use_mock || env_override
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    analyzer: AnalyzerSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn analyzer(&self) -> Result<AnalyzerSettings> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.analyzer.clone())
    }

    pub fn update_analyzer(&self, settings: AnalyzerSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        guard.analyzer = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
