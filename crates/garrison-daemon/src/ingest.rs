//! Deployment-log ingestion: fixed-format field extraction.
//!
//! The trusted automated account posts a multi-line log whose field-bearing
//! line looks like
//!
//! ```text
//! [E://] DEPLOYMENT-LOG >> VIP: Queen | GUARDS: A,B,C | DURATION: 2h | VOUCH: X,Y
//! ```
//!
//! followed somewhere by `SUBMITTED BY >> "Name"`. Fields are extracted by
//! splitting the field line on `|` and matching labels case-insensitively;
//! the submitter comes from the first quoted string on its line. Missing
//! fields default to empty; a missing field line or delimiter fails the
//! whole parse.

use regex::Regex;
use thiserror::Error;

use garrison_sheets::DeploymentRecord;

/// Marker token that gates ingestion.
pub const LOG_MARKER: &str = "DEPLOYMENT-LOG";

/// Errors from parsing a deployment log message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no line containing a VIP field")]
    MissingFieldLine,

    #[error("field line has no '>>' delimiter")]
    MissingDelimiter,
}

/// Parser for deployment log messages.
pub struct DeploymentLogParser {
    re_submitter: Regex,
}

impl DeploymentLogParser {
    pub fn new() -> Self {
        Self {
            re_submitter: Regex::new(r#""(.+?)""#).expect("hardcoded regex"),
        }
    }

    /// Parse the full message text into a [`DeploymentRecord`].
    pub fn parse(&self, text: &str) -> Result<DeploymentRecord, ParseError> {
        let field_line = text
            .lines()
            .find(|line| line.contains("VIP:"))
            .ok_or(ParseError::MissingFieldLine)?;

        let (_, fields) = field_line
            .split_once(">>")
            .ok_or(ParseError::MissingDelimiter)?;

        let mut record = DeploymentRecord {
            vip: String::new(),
            guards: String::new(),
            duration: String::new(),
            vouch: String::new(),
            submitted_by: String::new(),
        };

        for field in fields.split('|').map(str::trim) {
            if let Some(value) = label_value(field, "VIP:") {
                record.vip = value;
            } else if let Some(value) = label_value(field, "GUARDS:") {
                record.guards = value;
            } else if let Some(value) = label_value(field, "DURATION:") {
                record.duration = value;
            } else if let Some(value) = label_value(field, "VOUCH:") {
                record.vouch = value;
            }
        }

        if let Some(line) = text.lines().find(|line| line.contains("SUBMITTED BY")) {
            if let Some(captures) = self.re_submitter.captures(line) {
                record.submitted_by = captures[1].to_string();
            }
        }

        Ok(record)
    }
}

impl Default for DeploymentLogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// If `field` starts with `label` (case-insensitive), return the trimmed
/// remainder. Labels are ASCII, so byte offsets are safe.
fn label_value(field: &str, label: &str) -> Option<String> {
    if field.len() >= label.len() && field[..label.len()].eq_ignore_ascii_case(label) {
        Some(field[label.len()..].trim().to_string())
    } else {
        None
    }
}
