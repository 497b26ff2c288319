pub mod analysis;
pub mod db;
pub mod error;
pub mod journal;
pub mod llm;
pub mod models;
pub mod samples;
pub mod settings;
pub mod utils;

use std::path::Path;

use anyhow::Context;

pub use analysis::aggregate::milestone_probability;
pub use analysis::format::{
    format_direct_impact, format_impact, format_lifespan, format_long_term_impact,
    format_signed_impact, share_message,
};
pub use db::{Database, DATABASE_FILE_NAME};
pub use error::{AnalysisError, JournalError, MalformedResponseError, ParseError, StorageError};
pub use journal::Journal;
pub use llm::{Analyzer, GeminiClient, MockClient, ModelClient};
pub use models::{Category, Interaction, InteractionEffect, LifestyleItem, LogEntry};
pub use settings::{AnalyzerSettings, SettingsStore};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Open the journal stored under `data_dir`, creating it when missing.
pub fn open(data_dir: &Path) -> anyhow::Result<Journal> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let database = Database::new(data_dir.join(DATABASE_FILE_NAME))?;
    let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE_NAME))?;
    let analyzer = Analyzer::from_settings(&settings.analyzer()?)?;

    crate::log_info!(
        "Opened journal at {} using the {} model client",
        data_dir.display(),
        analyzer.client_name()
    );
    Ok(Journal::new(database, analyzer))
}
