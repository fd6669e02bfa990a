//! Duplicate detection against a snapshot of the owner's existing people

use crate::types::{ContactChannel, ExistingPerson, PersonCandidate};

/// Which signal made a candidate look like an existing person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSignal {
    /// Trimmed names equal, ignoring case
    Name,
    /// Identical value on an identifying contact channel
    Contact(ContactChannel),
}

/// Compare a candidate with one existing person.
///
/// Names are compared case-insensitively after trimming. Phone, email and
/// telegram values must be byte-for-byte equal; phone formats are not normalized.
pub fn match_signal(candidate: &PersonCandidate, existing: &ExistingPerson) -> Option<MatchSignal> {
    if candidate.name.trim().to_lowercase() == existing.name.trim().to_lowercase() {
        return Some(MatchSignal::Name);
    }

    ContactChannel::IDENTIFYING
        .into_iter()
        .find(|&channel| match (candidate.contact(channel), existing.contacts.get(channel)) {
            (Some(ours), Some(theirs)) => !ours.is_empty() && ours == theirs,
            _ => false,
        })
        .map(MatchSignal::Contact)
}

/// Existing people loaded once before the row loop.
///
/// Rows inserted during the run are not added, so two rows of the same file
/// never match each other.
#[derive(Debug, Clone, Default)]
pub struct DuplicateSnapshot {
    people: Vec<ExistingPerson>,
}

impl DuplicateSnapshot {
    pub fn new(people: Vec<ExistingPerson>) -> Self {
        Self { people }
    }

    /// First existing person the candidate matches, with the signal that matched
    pub fn find(&self, candidate: &PersonCandidate) -> Option<(&ExistingPerson, MatchSignal)> {
        self.people
            .iter()
            .find_map(|existing| match_signal(candidate, existing).map(|signal| (existing, signal)))
    }
}
