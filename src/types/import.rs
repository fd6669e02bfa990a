//! Import types for people CSV/XLSX import

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::person::{ContactChannel, ContactRecord};

/// One parsed row: trimmed, lowercased header → raw cell text
pub type RawRow = HashMap<String, String>;

/// Parsed row with its 1-based row number in the source file (header is row 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub number: usize,
    pub fields: RawRow,
}

/// Row of an import file, read out of a [`RawRow`] into the known columns.
///
/// Unknown columns are dropped here; nothing downstream looks at raw headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub name: Option<String>,
    pub profession: Option<String>,
    pub role: Option<String>,
    pub skills: Option<String>,
    pub tags: Option<String>,
    pub contacts: Vec<(ContactChannel, String)>,
    pub notes: Option<String>,
}

impl ImportRow {
    pub fn from_raw(raw: &RawRow) -> Self {
        let field = |key: &str| raw.get(key).cloned();

        let contacts = ContactChannel::ALL
            .iter()
            .filter_map(|channel| raw.get(channel.as_str()).map(|v| (*channel, v.clone())))
            .collect();

        Self {
            name: field("name"),
            profession: field("profession"),
            role: field("role"),
            skills: field("skills"),
            tags: field("tags"),
            contacts,
            notes: field("notes"),
        }
    }

    /// Contact columns that carry a non-blank value
    pub fn contact_record(&self) -> ContactRecord {
        let mut record = ContactRecord::new();
        for (channel, value) in &self.contacts {
            record.set(*channel, value);
        }
        record
    }
}

/// Row flagged as a likely duplicate of an existing person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRecord {
    pub row: usize,
    pub name: String,
}

/// Outcome of one import request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: u32,
    pub failed: u32,
    pub duplicates: u32,
    pub errors: Vec<String>,
    pub duplicate_records: Vec<DuplicateRecord>,
}

impl ImportResult {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(message.into());
    }

    pub fn record_duplicate(&mut self, row: usize, name: &str) {
        self.duplicates += 1;
        self.duplicate_records.push(DuplicateRecord {
            row,
            name: name.to_string(),
        });
    }
}

/// Options accepted alongside the uploaded file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Do not insert rows that look like existing people
    pub skip_duplicates: bool,
}

impl ImportOptions {
    /// Parse the `skipDuplicates` form value. Only the exact string `true` enables skipping.
    pub fn from_form_value(value: Option<&str>) -> Self {
        Self {
            skip_duplicates: value == Some("true"),
        }
    }
}
