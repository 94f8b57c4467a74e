//! Repository for the `crews` and `crew_members` tables.

use chrono::Utc;
use landscaper_core::types::DbId;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::crew::{CreateCrew, Crew, UpdateCrew};
use crate::models::member::Member;

const SELECT_CREWS: &str = "SELECT c.id, c.name,
        (SELECT COUNT(*) FROM crew_members cm WHERE cm.crew_id = c.id) AS member_count,
        c.created_at, c.updated_at
     FROM crews c";

/// Provides CRUD and membership operations for crews.
pub struct CrewRepo;

impl CrewRepo {
    /// Insert a new crew, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateCrew) -> Result<Crew, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO crews (name, created_at, updated_at) VALUES ($1, $2, $2) RETURNING id",
        )
        .bind(input.name.trim())
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a crew by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Crew>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("{SELECT_CREWS} WHERE c.id = $1");
        sqlx::query_as::<_, Crew>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all crews alphabetically with their member counts.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Crew>, sqlx::Error> {
        let query = format!("{SELECT_CREWS} ORDER BY c.name COLLATE NOCASE, c.id");
        sqlx::query_as::<_, Crew>(&query).fetch_all(pool).await
    }

    /// Rename a crew. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateCrew,
    ) -> Result<Option<Crew>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE crews SET name = COALESCE($2, name), updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(Utc::now())
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a crew. Its jobs become unassigned. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM crews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Members of a crew, alphabetically.
    pub async fn members(pool: &SqlitePool, crew_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            "SELECT m.id, m.name, m.phone, m.created_at, m.updated_at
             FROM members m
             JOIN crew_members cm ON cm.member_id = m.id
             WHERE cm.crew_id = $1
             ORDER BY m.name COLLATE NOCASE, m.id",
        )
        .bind(crew_id)
        .fetch_all(pool)
        .await
    }

    /// Add a member to a crew. Returns `false` if they already belong to it.
    pub async fn add_member(
        pool: &SqlitePool,
        crew_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO crew_members (crew_id, member_id) VALUES ($1, $2)
             ON CONFLICT (crew_id, member_id) DO NOTHING",
        )
        .bind(crew_id)
        .bind(member_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a member from a crew. Returns `true` if they belonged to it.
    pub async fn remove_member(
        pool: &SqlitePool,
        crew_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM crew_members WHERE crew_id = $1 AND member_id = $2")
            .bind(crew_id)
            .bind(member_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
