//! Tabular row store for the garrison bot.
//!
//! The [`RowStore`] trait is the seam between handlers and the external
//! spreadsheet: row-oriented get/update/append keyed by a spreadsheet ID and
//! an A1-style range. [`SheetsClient`] is the Google Sheets REST
//! implementation; [`MemoryStore`] backs tests. The typed tables in
//! [`tables`] implement the upsert pattern on top of the trait, serialized
//! per key.

pub mod memory;
pub mod rest;
pub mod store;
pub mod tables;

pub use memory::MemoryStore;
pub use rest::SheetsClient;
pub use store::{RowStore, StoreError};
pub use tables::{DeploymentLogTable, DeploymentRecord, RankTable, StrikeTable};
