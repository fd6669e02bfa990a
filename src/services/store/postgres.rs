//! PostgreSQL-backed person store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PersonStore;
use crate::db::queries;
use crate::types::{ExistingPerson, Person, PersonCandidate};

pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn snapshot(&self, owner_id: Uuid) -> Result<Vec<ExistingPerson>> {
        queries::person::list_duplicate_candidates(&self.pool, owner_id).await
    }

    async fn insert(&self, owner_id: Uuid, candidate: &PersonCandidate) -> Result<Person> {
        queries::person::create_person(&self.pool, owner_id, candidate).await
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
