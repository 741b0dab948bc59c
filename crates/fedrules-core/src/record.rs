//! Rule-detail records produced by the scraper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured details of one GAO federal rule page.
///
/// One record is produced per [`ScrapeRequest`](crate::ScrapeRequest) and
/// written to the output JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDetailRecord {
    /// The request URL, unchanged.
    pub url: String,
    /// GAO rule identifier taken from the URL's last path segment.
    pub rule_id: Option<String>,
    pub title: Option<String>,
    /// Label/value pairs from the page, keyed by [`field_key`].
    pub fields: BTreeMap<String, String>,
    /// ISO 8601 timestamp string.
    pub scraped_at: String,
}

impl RuleDetailRecord {
    /// Look up an extracted field by its display label or its key.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.get(&field_key(label)).map(String::as_str)
    }
}

/// Normalise a display label into a snake_case field key.
///
/// "Federal Register Number" → "federal_register_number"
/// "Received by GAO:" → "received_by_gao"
///
/// Runs of non-alphanumeric characters collapse to one underscore; leading and
/// trailing separators are dropped.
pub fn field_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}
