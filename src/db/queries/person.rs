//! Person database queries

use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{ContactRecord, ExistingPerson, Person, PersonCandidate};

/// Create a new person
pub async fn create_person(
    pool: &PgPool,
    user_id: Uuid,
    req: &PersonCandidate,
) -> Result<Person> {
    let person = sqlx::query_as::<_, Person>(
        r#"
        INSERT INTO people (
            id, user_id, name, profession, role,
            skills, tags, contacts, notes,
            created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5,
            $6, $7, $8, $9,
            NOW(), NOW()
        )
        RETURNING
            id, user_id, name, profession, role,
            skills, tags, contacts, notes,
            created_at, updated_at
        "#
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&req.name)
    .bind(&req.profession)
    .bind(&req.role)
    .bind(&req.skills)
    .bind(&req.tags)
    .bind(req.contacts.as_ref().map(Json))
    .bind(&req.notes)
    .fetch_one(pool)
    .await?;

    Ok(person)
}

/// Names and contacts of all people of a user, for duplicate detection
pub async fn list_duplicate_candidates(pool: &PgPool, user_id: Uuid) -> Result<Vec<ExistingPerson>> {
    let rows: Vec<(String, Option<Json<ContactRecord>>)> = sqlx::query_as(
        r#"
        SELECT name, contacts
        FROM people
        WHERE user_id = $1
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, contacts)| ExistingPerson {
            name,
            contacts: contacts.map(|c| c.0).unwrap_or_default(),
        })
        .collect())
}
