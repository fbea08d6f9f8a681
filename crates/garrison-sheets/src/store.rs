//! Core row store trait and error type.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from row store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("invalid range: {0}")]
    Range(String),

    #[error("{0}")]
    Other(String),
}

/// Row-oriented access to a spreadsheet-like store.
///
/// All operations are keyed by a spreadsheet identifier and an A1-style
/// range (`Tab!A:B` for whole columns, `Tab!A3:B3` for one row). Rows are
/// plain string cells; schema is the caller's business.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch all rows in the given range.
    async fn get_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError>;

    /// Overwrite the rows in the given range.
    async fn update_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError>;

    /// Append one row after the last data row of the given range.
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<(), StoreError>;
}
