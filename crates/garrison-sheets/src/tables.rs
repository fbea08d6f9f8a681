//! Typed tables over the row store.
//!
//! Strikes and ranks are keyed by user ID and upserted: look up the row for
//! the key, update it if present, append otherwise. The read-modify-write
//! window is serialized per key with an async lock, so two near-simultaneous
//! upserts for the same user cannot both observe "not found" and both
//! append. The deployment log is append-only and needs no locking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use crate::store::{RowStore, StoreError};

/// Per-key async locks, created on first use.
///
/// The outer mutex only guards the map itself; the per-key mutexes are held
/// across store calls.
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}

/// Find the row whose first cell equals `key`. Returns the 1-based sheet
/// row number and the row itself.
fn find_row<'a>(rows: &'a [Vec<String>], key: &str) -> Option<(usize, &'a Vec<String>)> {
    rows.iter()
        .enumerate()
        .find(|(_, row)| row.first().is_some_and(|cell| cell == key))
        .map(|(idx, row)| (idx + 1, row))
}

/// Per-user strike counter table (`[UserId, StrikeCount]`).
pub struct StrikeTable {
    tab: String,
    locks: KeyedLocks,
}

impl StrikeTable {
    pub fn new() -> Self {
        Self {
            tab: "Strikes".to_string(),
            locks: KeyedLocks::default(),
        }
    }

    /// Increment the strike count for a user, creating the row at 1 if
    /// absent. Returns the new total.
    pub async fn increment(
        &self,
        store: &dyn RowStore,
        spreadsheet_id: &str,
        user_id: &str,
    ) -> Result<u32, StoreError> {
        let _guard = self.locks.lock_for(user_id).lock_owned().await;

        let range = format!("{}!A:B", self.tab);
        let rows = store.get_rows(spreadsheet_id, &range).await?;

        match find_row(&rows, user_id) {
            Some((row_number, row)) => {
                let count = row
                    .get(1)
                    .and_then(|c| c.trim().parse::<u32>().ok())
                    .unwrap_or(0)
                    + 1;
                let row_range = format!("{}!A{row_number}:B{row_number}", self.tab);
                store
                    .update_rows(
                        spreadsheet_id,
                        &row_range,
                        vec![vec![user_id.to_string(), count.to_string()]],
                    )
                    .await?;
                debug!(user = %user_id, count, "strike row updated");
                Ok(count)
            }
            None => {
                store
                    .append_row(
                        spreadsheet_id,
                        &range,
                        vec![user_id.to_string(), "1".to_string()],
                    )
                    .await?;
                debug!(user = %user_id, "strike row created");
                Ok(1)
            }
        }
    }
}

impl Default for StrikeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-user rank table (`[UserId, Rank]`).
pub struct RankTable {
    tab: String,
    locks: KeyedLocks,
}

impl RankTable {
    pub fn new() -> Self {
        Self {
            tab: "Ranks".to_string(),
            locks: KeyedLocks::default(),
        }
    }

    /// Record a new rank for a user, creating the row if absent. Returns
    /// the previous rank if one was recorded.
    pub async fn promote(
        &self,
        store: &dyn RowStore,
        spreadsheet_id: &str,
        user_id: &str,
        rank: &str,
    ) -> Result<Option<String>, StoreError> {
        let _guard = self.locks.lock_for(user_id).lock_owned().await;

        let range = format!("{}!A:B", self.tab);
        let rows = store.get_rows(spreadsheet_id, &range).await?;

        match find_row(&rows, user_id) {
            Some((row_number, row)) => {
                let previous = row.get(1).cloned();
                let row_range = format!("{}!A{row_number}:B{row_number}", self.tab);
                store
                    .update_rows(
                        spreadsheet_id,
                        &row_range,
                        vec![vec![user_id.to_string(), rank.to_string()]],
                    )
                    .await?;
                Ok(previous)
            }
            None => {
                store
                    .append_row(
                        spreadsheet_id,
                        &range,
                        vec![user_id.to_string(), rank.to_string()],
                    )
                    .await?;
                Ok(None)
            }
        }
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One parsed deployment log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub vip: String,
    pub guards: String,
    pub duration: String,
    pub vouch: String,
    pub submitted_by: String,
}

/// Append-only deployment log table
/// (`[VIP, Guards, Duration, Vouch, SubmittedBy, TimestampISO8601]`).
pub struct DeploymentLogTable {
    tab: String,
}

impl DeploymentLogTable {
    pub fn new() -> Self {
        Self {
            tab: "Sheet1".to_string(),
        }
    }

    /// Append one record with a timestamp generated at append time.
    pub async fn append(
        &self,
        store: &dyn RowStore,
        spreadsheet_id: &str,
        record: &DeploymentRecord,
    ) -> Result<(), StoreError> {
        let range = format!("{}!A:F", self.tab);
        store
            .append_row(
                spreadsheet_id,
                &range,
                vec![
                    record.vip.clone(),
                    record.guards.clone(),
                    record.duration.clone(),
                    record.vouch.clone(),
                    record.submitted_by.clone(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .await
    }
}

impl Default for DeploymentLogTable {
    fn default() -> Self {
        Self::new()
    }
}
