//! Transaction Journal
//!
//! Append-only newline-delimited JSON log, one line per completed action,
//! capturing the balance before and after. Write failures are reported to
//! the caller, who logs a warning and carries on; the journal never
//! affects game state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::game::egg::Currency;

/// One journaled action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub action: String,
    pub egg_id: String,
    pub egg_type: String,
    pub bet_amount: Currency,
    pub win_amount: Currency,
    pub result: String,
    pub bonus: bool,
    pub balance_before: Currency,
    pub balance_after: Currency,
}

/// Append-only NDJSON transaction log.
#[derive(Debug, Clone)]
pub struct TransactionJournal {
    path: PathBuf,
}

impl TransactionJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single JSON line, creating the log file and
    /// its parent directory on first use.
    pub async fn append(&self, entry: &JournalEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(result: &str) -> JournalEntry {
        JournalEntry {
            timestamp: Utc::now(),
            user_id: "player-7".to_string(),
            action: "crack".to_string(),
            egg_id: "aa".to_string(),
            egg_type: "gold".to_string(),
            bet_amount: 100,
            win_amount: 200,
            result: result.to_string(),
            bonus: true,
            balance_before: 1000,
            balance_after: 1100,
        }
    }

    #[tokio::test]
    async fn test_appends_one_line_per_entry() {
        let dir = std::env::temp_dir().join(format!("eggs-journal-{}", uuid::Uuid::new_v4()));
        let journal = TransactionJournal::new(dir.join("transactions.jsonl"));

        journal.append(&entry("win")).await.unwrap();
        journal.append(&entry("lose")).await.unwrap();

        let contents = tokio::fs::read_to_string(journal.path()).await.unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: JournalEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.result, "win");
        assert_eq!(first.balance_before, 1000);
        assert_eq!(first.balance_after, 1100);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_entry_field_names() {
        let value = serde_json::to_value(entry("win")).unwrap();
        assert_eq!(value["userId"], "player-7");
        assert_eq!(value["balanceBefore"], 1000);
        assert_eq!(value["balanceAfter"], 1100);
        assert_eq!(value["eggType"], "gold");
    }
}
