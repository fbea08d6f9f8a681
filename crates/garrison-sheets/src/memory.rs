//! In-memory [`RowStore`] for tests.
//!
//! Keyed by tab name (the part of the range before `!`); the spreadsheet ID
//! is accepted and ignored. Supports the same range shapes the typed tables
//! use: whole-column ranges for reads/appends and single-row ranges for
//! updates. A failure switch turns every operation into an error, for
//! exercising handler error paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{RowStore, StoreError};

/// Split `Tab!A3:B3` into the tab name and the cell part.
fn split_range(range: &str) -> Result<(&str, &str), StoreError> {
    range
        .split_once('!')
        .ok_or_else(|| StoreError::Range(format!("range has no tab: {range}")))
}

/// Extract the 1-based row number from a single-row range like `A3:B3`.
fn row_number(cells: &str) -> Option<usize> {
    let first = cells.split(':').next()?;
    let digits: String = first.chars().skip_while(|c| c.is_ascii_alphabetic()).collect();
    digits.parse().ok()
}

/// In-memory row store.
#[derive(Default)]
pub struct MemoryStore {
    tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
    fail_all: Mutex<bool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows in a tab, for assertions.
    pub fn rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.tabs
            .lock()
            .unwrap()
            .get(tab)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every subsequent operation fail.
    pub fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        if *self.fail_all.lock().unwrap() {
            return Err(StoreError::Api("scripted store failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn get_rows(
        &self,
        _spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        self.check_failure()?;
        let (tab, _) = split_range(range)?;
        Ok(self.rows(tab))
    }

    async fn update_rows(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        let (tab, cells) = split_range(range)?;
        let row = row_number(cells)
            .ok_or_else(|| StoreError::Range(format!("expected a row range: {range}")))?;

        let mut tabs = self.tabs.lock().unwrap();
        let data = tabs.entry(tab.to_string()).or_default();
        if row == 0 || row > data.len() {
            return Err(StoreError::Range(format!(
                "row {row} out of bounds for tab {tab}"
            )));
        }
        for (offset, new_row) in rows.into_iter().enumerate() {
            match data.get_mut(row - 1 + offset) {
                Some(slot) => *slot = new_row,
                None => data.push(new_row),
            }
        }
        Ok(())
    }

    async fn append_row(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        let (tab, _) = split_range(range)?;
        self.tabs
            .lock()
            .unwrap()
            .entry(tab.to_string())
            .or_default()
            .push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn memory_store_append_and_get() {
        let store = MemoryStore::new();
        store
            .append_row("sheet", "Strikes!A:B", row(&["alice", "1"]))
            .await
            .unwrap();
        store
            .append_row("sheet", "Strikes!A:B", row(&["bob", "3"]))
            .await
            .unwrap();

        let rows = store.get_rows("sheet", "Strikes!A:B").await.unwrap();
        assert_eq!(rows, vec![row(&["alice", "1"]), row(&["bob", "3"])]);
    }

    #[tokio::test]
    async fn memory_store_updates_single_row() {
        let store = MemoryStore::new();
        store
            .append_row("sheet", "Strikes!A:B", row(&["alice", "1"]))
            .await
            .unwrap();
        store
            .update_rows("sheet", "Strikes!A1:B1", vec![row(&["alice", "2"])])
            .await
            .unwrap();

        assert_eq!(store.rows("Strikes"), vec![row(&["alice", "2"])]);
    }

    #[tokio::test]
    async fn memory_store_rejects_out_of_bounds_update() {
        let store = MemoryStore::new();
        let err = store
            .update_rows("sheet", "Strikes!A5:B5", vec![row(&["x", "y"])])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Range(_)));
    }

    #[tokio::test]
    async fn memory_store_failure_switch() {
        let store = MemoryStore::new();
        store.fail_all();
        assert!(store.get_rows("sheet", "Strikes!A:B").await.is_err());
    }

    #[test]
    fn row_number_parses_single_row_ranges() {
        assert_eq!(row_number("A3:B3"), Some(3));
        assert_eq!(row_number("A12"), Some(12));
        assert_eq!(row_number("A:B"), None);
    }
}
