//! Screen-level actions over the analyzer and the entry store.

use chrono::{DateTime, Utc};
use rand::thread_rng;

use crate::analysis::aggregate::{CategoryTotal, HistorySection, RECENT_WINDOW};
use crate::analysis::{category_totals, group_by_month, milestone_probability, recent_impact};
use crate::db::Database;
use crate::error::{JournalError, StorageError};
use crate::llm::Analyzer;
use crate::models::LogEntry;
use crate::samples::generate_sample_entries;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::journal";

fn storage(err: anyhow::Error) -> JournalError {
    log_error!("Storage failure: {err:#}");
    JournalError::Storage(StorageError::from(err))
}

#[derive(Clone)]
pub struct Journal {
    db: Database,
    analyzer: Analyzer,
}

impl Journal {
    pub fn new(db: Database, analyzer: Analyzer) -> Self {
        Self { db, analyzer }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Analyze `content` and persist the result. Nothing is saved when the
    /// analysis fails.
    pub async fn analyze_and_save(
        &self,
        content: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<LogEntry, JournalError> {
        let entry = self.analyzer.analyze(content, date).await.map_err(|err| {
            log_error!("Analysis failed: {err}");
            err
        })?;
        self.db.save_log_entry(&entry).await.map_err(storage)?;
        Ok(entry)
    }

    /// Replace an entry's text and analysis, keeping its id, date and
    /// creation time.
    pub async fn reanalyze(&self, entry_id: &str, content: &str) -> Result<LogEntry, JournalError> {
        let existing = self
            .db
            .get_log_entry(entry_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| JournalError::NotFound(entry_id.to_string()))?;

        let fresh = self.analyzer.analyze(content, Some(existing.date)).await?;
        let updated = LogEntry {
            id: existing.id,
            date: existing.date,
            created_at: existing.created_at,
            raw_content: fresh.raw_content,
            items: fresh.items,
            net_impact: fresh.net_impact,
        };

        self.db.save_log_entry(&updated).await.map_err(storage)?;
        log_info!("Re-analyzed entry {}", updated.id);
        Ok(updated)
    }

    pub async fn save(&self, entry: &LogEntry) -> Result<String, JournalError> {
        self.db.save_log_entry(entry).await.map_err(storage)
    }

    pub async fn get(&self, entry_id: &str) -> Result<Option<LogEntry>, JournalError> {
        self.db.get_log_entry(entry_id).await.map_err(storage)
    }

    /// Like `get`, but a missing entry is an error.
    pub async fn entry(&self, entry_id: &str) -> Result<LogEntry, JournalError> {
        self.get(entry_id)
            .await?
            .ok_or_else(|| JournalError::NotFound(entry_id.to_string()))
    }

    /// Most recently saved first.
    pub async fn get_all(&self) -> Result<Vec<LogEntry>, JournalError> {
        self.db.get_all_log_entries().await.map_err(storage)
    }

    pub async fn delete(&self, entry_id: &str) -> Result<(), JournalError> {
        self.db.delete_log_entry(entry_id).await.map_err(storage)
    }

    /// Net impact of the seven most recent days.
    pub async fn weekly_impact(&self) -> Result<f64, JournalError> {
        let entries = self.get_all().await?;
        Ok(recent_impact(&entries, RECENT_WINDOW))
    }

    /// A dashboard milestone's probability in percent, moved from `base` by
    /// the weekly impact.
    pub async fn milestone_probability(&self, base: u8) -> Result<u8, JournalError> {
        Ok(milestone_probability(base, self.weekly_impact().await?))
    }

    pub async fn category_totals(&self) -> Result<Vec<CategoryTotal>, JournalError> {
        let entries = self.get_all().await?;
        Ok(category_totals(&entries))
    }

    /// Entries grouped by month, newest first.
    pub async fn history(&self) -> Result<Vec<HistorySection>, JournalError> {
        let entries = self.get_all().await?;
        Ok(group_by_month(&entries))
    }

    pub async fn export(&self) -> Result<String, JournalError> {
        self.db.export_log_entries().await.map_err(storage)
    }

    pub async fn import(&self, json: &str) -> Result<usize, JournalError> {
        let count = self.db.import_log_entries(json).await.map_err(storage)?;
        log_info!("Imported {count} log entries");
        Ok(count)
    }

    /// Store `count` random demo entries.
    pub async fn seed_sample_entries(&self, count: usize) -> Result<Vec<LogEntry>, JournalError> {
        let entries = generate_sample_entries(count, &mut thread_rng());
        let json = serde_json::to_string(&entries)
            .map_err(|err| storage(anyhow::Error::new(err).context("failed to serialize samples")))?;
        self.import(&json).await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::analysis::Prompt;
    use crate::db::DATABASE_FILE_NAME;
    use crate::error::AnalysisError;
    use crate::llm::{MockClient, ModelClient};
    use crate::models::Category;

    struct Garbled;

    #[async_trait::async_trait]
    impl ModelClient for Garbled {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, AnalysisError> {
            Ok("Sorry, I had trouble with that one.".into())
        }

        fn name(&self) -> &'static str {
            "garbled"
        }
    }

    fn journal_with(dir: &TempDir, client: Arc<dyn ModelClient>) -> Journal {
        let db = Database::new(dir.path().join(DATABASE_FILE_NAME)).unwrap();
        Journal::new(db, Analyzer::new(client))
    }

    fn journal(dir: &TempDir) -> Journal {
        journal_with(dir, Arc::new(MockClient::new()))
    }

    #[tokio::test]
    async fn analyze_and_save_persists_entry() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);

        let entry = journal
            .analyze_and_save("Spent time with friends over dinner", None)
            .await
            .unwrap();
        assert_eq!(entry.items[0].category, Category::Social);

        let stored = journal.entry(&entry.id).await.unwrap();
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn failed_analysis_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let journal = journal_with(&dir, Arc::new(Garbled));

        let err = journal.analyze_and_save("anything", None).await.unwrap_err();
        assert_eq!(err.user_message(), "Analysis failed, please try again.");
        assert!(journal.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reanalyze_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);
        let date = Utc.with_ymd_and_hms(2026, 9, 30, 12, 0, 0).unwrap();
        let original = journal
            .analyze_and_save("Slept until noon", Some(date))
            .await
            .unwrap();

        let updated = journal
            .reanalyze(&original.id, "Actually I went to hang out with friends")
            .await
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, date);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.raw_content, "Actually I went to hang out with friends");
        assert_eq!(updated.items.len(), 1);

        let all = journal.get_all().await.unwrap();
        assert_eq!(all, vec![updated]);
    }

    #[tokio::test]
    async fn reanalyze_missing_entry_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = journal(&dir).reanalyze("log_missing", "text").await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound(id) if id == "log_missing"));
    }

    #[tokio::test]
    async fn delete_then_entry_is_not_found() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);
        let entry = journal.analyze_and_save("quiet day", None).await.unwrap();

        journal.delete(&entry.id).await.unwrap();
        assert!(journal.get(&entry.id).await.unwrap().is_none());
        assert!(matches!(
            journal.entry(&entry.id).await,
            Err(JournalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn weekly_impact_counts_seven_latest_days() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);
        let start = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();

        let mut expected = 0.0;
        for day in 0..9 {
            let entry = journal
                .analyze_and_save("hang out with friends", Some(start + Duration::days(day)))
                .await
                .unwrap();
            if day >= 2 {
                expected += entry.net_impact;
            }
        }

        let weekly = journal.weekly_impact().await.unwrap();
        assert!((weekly - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn dashboards_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);
        assert_eq!(journal.weekly_impact().await.unwrap(), 0.0);
        assert_eq!(journal.milestone_probability(35).await.unwrap(), 35);
        assert!(journal.category_totals().await.unwrap().is_empty());
        assert!(journal.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_samples_feed_history() {
        let dir = TempDir::new().unwrap();
        let journal = journal(&dir);
        let seeded = journal.seed_sample_entries(12).await.unwrap();

        let all = journal.get_all().await.unwrap();
        assert_eq!(all.len(), 12);
        assert_eq!(all, seeded);

        let grouped: usize = journal
            .history()
            .await
            .unwrap()
            .iter()
            .map(|section| section.entries.len())
            .sum();
        assert_eq!(grouped, 12);
    }

    #[tokio::test]
    async fn export_import_between_journals() {
        let source_dir = TempDir::new().unwrap();
        let source = journal(&source_dir);
        source.analyze_and_save("ran 5k", None).await.unwrap();
        source.analyze_and_save("met a friend", None).await.unwrap();
        let blob = source.export().await.unwrap();

        let target_dir = TempDir::new().unwrap();
        let target = journal(&target_dir);
        assert_eq!(target.import(&blob).await.unwrap(), 2);
        assert_eq!(target.get_all().await.unwrap(), source.get_all().await.unwrap());
    }

    #[tokio::test]
    async fn invalid_import_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let err = journal(&dir).import("not json").await.unwrap_err();
        assert_eq!(err.user_message(), "Could not save or load your entries.");
    }
}
