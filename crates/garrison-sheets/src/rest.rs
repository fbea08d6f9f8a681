//! Google Sheets REST implementation of [`RowStore`].
//!
//! Uses the `spreadsheets.values` endpoints: `GET` for reads, `PUT` for
//! in-place updates, and the `:append` variant for appends. Values are
//! written with `USER_ENTERED` input semantics, matching how the sheet is
//! edited by hand.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::store::{RowStore, StoreError};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Wire shape of the `values` endpoints.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Row store backed by the Google Sheets API.
pub struct SheetsClient {
    client: Client,
    token: String,
}

impl SheetsClient {
    /// Create a client authenticating with the given OAuth access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable>".to_string());
        Err(StoreError::Api(format!("sheets returned {status}: {body}")))
    }
}

#[async_trait]
impl RowStore for SheetsClient {
    async fn get_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .client
            .get(format!("{API_BASE}/{spreadsheet_id}/values/{range}"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let parsed: ValueRange = Self::check(response).await?.json().await?;
        Ok(parsed.values)
    }

    async fn update_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .put(format!("{API_BASE}/{spreadsheet_id}/values/{range}"))
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&ValueRange { values: rows })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn append_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!(
                "{API_BASE}/{spreadsheet_id}/values/{range}:append"
            ))
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&ValueRange { values: vec![row] })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_deserializes_missing_values() {
        let parsed: ValueRange = serde_json::from_str("{}").unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn value_range_roundtrip() {
        let range = ValueRange {
            values: vec![vec!["a".into(), "1".into()]],
        };
        let json = serde_json::to_string(&range).unwrap();
        let back: ValueRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values, range.values);
    }
}
