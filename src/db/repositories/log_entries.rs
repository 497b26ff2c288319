use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::db::{
    helpers::{format_datetime, items_from_json, items_to_json, parse_datetime},
    Database,
};
use crate::log_debug;
use crate::models::LogEntry;

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::db";

fn row_to_log_entry(row: &Row) -> Result<LogEntry> {
    let id: String = row.get("id")?;
    let entry_date: String = row.get("entry_date")?;
    let items_json: String = row.get("items_json")?;
    let created_at: String = row.get("created_at")?;

    Ok(LogEntry {
        items: items_from_json(&items_json, &id)?,
        date: parse_datetime(&entry_date, "entry_date")?,
        raw_content: row.get("raw_content")?,
        net_impact: row.get("net_impact")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        id,
    })
}

/// Insert or replace by id. The row always receives the next `saved_seq`, so
/// a re-saved entry moves to the front of `get_all_log_entries`.
/// `created_at` of an existing row is kept.
fn upsert_log_entry(conn: &Connection, entry: &LogEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO log_entries (id, entry_date, raw_content, items_json, net_impact, created_at, saved_seq)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, (SELECT COALESCE(MAX(saved_seq), 0) + 1 FROM log_entries))
         ON CONFLICT(id) DO UPDATE SET
             entry_date = excluded.entry_date,
             raw_content = excluded.raw_content,
             items_json = excluded.items_json,
             net_impact = excluded.net_impact,
             saved_seq = excluded.saved_seq",
        params![
            entry.id,
            format_datetime(&entry.date),
            entry.raw_content,
            items_to_json(&entry.items)?,
            entry.net_impact,
            format_datetime(&entry.created_at),
        ],
    )
    .with_context(|| format!("failed to save log entry {}", entry.id))?;
    Ok(())
}

impl Database {
    /// Save an entry and return its id.
    pub async fn save_log_entry(&self, entry: &LogEntry) -> Result<String> {
        let record = entry.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            upsert_log_entry(&tx, &record)?;
            tx.commit().context("failed to commit log entry")?;
            log_debug!("Saved log entry {}", record.id);
            Ok(record.id)
        })
        .await
    }

    pub async fn get_log_entry(&self, entry_id: &str) -> Result<Option<LogEntry>> {
        let entry_id = entry_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, entry_date, raw_content, items_json, net_impact, created_at
                 FROM log_entries
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![entry_id])?;
            let entry = match rows.next()? {
                Some(row) => Some(row_to_log_entry(row)?),
                None => None,
            };
            Ok(entry)
        })
        .await
    }

    /// Every stored entry, most recently saved first.
    pub async fn get_all_log_entries(&self) -> Result<Vec<LogEntry>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, entry_date, raw_content, items_json, net_impact, created_at
                 FROM log_entries
                 ORDER BY saved_seq DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_log_entry(row)?);
            }

            Ok(entries)
        })
        .await
    }

    /// Remove the entry if present. Deleting a missing id is not an error.
    pub async fn delete_log_entry(&self, entry_id: &str) -> Result<()> {
        let entry_id = entry_id.to_string();
        self.execute(move |conn| {
            let removed = conn
                .execute("DELETE FROM log_entries WHERE id = ?1", params![entry_id])
                .with_context(|| format!("failed to delete log entry {entry_id}"))?;
            log_debug!("Deleted {removed} row(s) for log entry {entry_id}");
            Ok(())
        })
        .await
    }

    /// Load a JSON array of entries, newest first, in one transaction.
    /// Returns the number of entries written.
    pub async fn import_log_entries(&self, json: &str) -> Result<usize> {
        let entries: Vec<LogEntry> =
            serde_json::from_str(json).context("failed to parse log entry array")?;

        self.execute(move |conn| {
            let tx = conn.transaction()?;
            for entry in entries.iter().rev() {
                upsert_log_entry(&tx, entry)?;
            }
            tx.commit().context("failed to commit imported log entries")?;
            Ok(entries.len())
        })
        .await
    }

    /// JSON array of every entry in `get_all_log_entries` order.
    pub async fn export_log_entries(&self) -> Result<String> {
        let entries = self.get_all_log_entries().await?;
        serde_json::to_string(&entries).context("failed to serialize log entries")
    }
}
