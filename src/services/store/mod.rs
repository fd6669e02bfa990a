//! Person store abstraction
//!
//! PostgreSQL in production, in-memory for tests and store-less development runs.

mod postgres;

pub use postgres::PgPersonStore;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::types::Json;
use uuid::Uuid;

use crate::types::{ExistingPerson, Person, PersonCandidate};

/// Longest name the store accepts (mirrors the `people_name_length` constraint)
pub const MAX_NAME_LENGTH: usize = 200;

/// Storage backend for people, scoped per owner
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Name and contacts of every person the owner already has
    async fn snapshot(&self, owner_id: Uuid) -> Result<Vec<ExistingPerson>>;

    /// Insert a new person for the owner
    async fn insert(&self, owner_id: Uuid, candidate: &PersonCandidate) -> Result<Person>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// In-memory person store
#[derive(Default)]
pub struct MemoryPersonStore {
    people: RwLock<Vec<Person>>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryPersonStore {
    /// All people of one owner, in insertion order
    pub fn people_of(&self, owner_id: Uuid) -> Vec<Person> {
        self.people
            .read()
            .iter()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.people.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.read().is_empty()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn snapshot(&self, owner_id: Uuid) -> Result<Vec<ExistingPerson>> {
        Ok(self
            .people
            .read()
            .iter()
            .filter(|p| p.user_id == owner_id)
            .map(ExistingPerson::from)
            .collect())
    }

    async fn insert(&self, owner_id: Uuid, candidate: &PersonCandidate) -> Result<Person> {
        if candidate.name.trim().is_empty() {
            bail!("name must not be blank");
        }
        if candidate.name.chars().count() > MAX_NAME_LENGTH {
            bail!("value too long for name (max {} characters)", MAX_NAME_LENGTH);
        }

        let now = Utc::now();
        let person = Person {
            id: Uuid::new_v4(),
            user_id: owner_id,
            name: candidate.name.clone(),
            profession: candidate.profession.clone(),
            role: candidate.role.clone(),
            skills: candidate.skills.clone(),
            tags: candidate.tags.clone(),
            contacts: candidate.contacts.clone().map(Json),
            notes: candidate.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.people.write().push(person.clone());
        Ok(person)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
