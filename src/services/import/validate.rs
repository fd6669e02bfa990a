//! Row validation and normalization

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::{ContactChannel, ImportRow, PersonCandidate};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern compiles")
});

/// Row-level validation failure. The message is what ends up in `ImportResult::errors`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Row {row}: Name is required")]
    MissingName { row: usize },

    #[error("Row {row} ({name}): Invalid email format")]
    InvalidEmail { row: usize, name: String },
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trimmed text, or `None` when nothing is left
fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Split a comma separated cell. Blank input (or only separators) yields `None`.
fn split_list(value: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Validate one row and shape it into a candidate person.
///
/// `row` is the 1-based line number in the source file (header is row 1).
pub fn validate_row(row: &ImportRow, row_number: usize) -> Result<PersonCandidate, RowError> {
    let name = clean_text(row.name.as_deref())
        .ok_or(RowError::MissingName { row: row_number })?;

    let contacts = row.contact_record();
    if let Some(email) = contacts.get(ContactChannel::Email) {
        if !is_valid_email(email) {
            return Err(RowError::InvalidEmail { row: row_number, name });
        }
    }

    Ok(PersonCandidate {
        name,
        profession: clean_text(row.profession.as_deref()),
        role: clean_text(row.role.as_deref()),
        skills: split_list(row.skills.as_deref()),
        tags: split_list(row.tags.as_deref()),
        contacts: if contacts.is_empty() { None } else { Some(contacts) },
        notes: clean_text(row.notes.as_deref()),
    })
}
