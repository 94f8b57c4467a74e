//! Repository for the `members` table.

use chrono::Utc;
use landscaper_core::types::DbId;
use landscaper_core::validation::non_blank;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::crew::Crew;
use crate::models::member::{CreateMember, Member, UpdateMember};

const COLUMNS: &str = "id, name, phone, created_at, updated_at";

/// Provides CRUD operations for crew members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (name, phone, created_at, updated_at)
             VALUES ($1, $2, $3, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.name.trim())
            .bind(non_blank(input.phone.clone()))
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a member by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Member>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all members alphabetically.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members ORDER BY name COLLATE NOCASE, id");
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// Update a member. Only non-`None` fields are applied; an empty phone
    /// clears it. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                name = COALESCE($2, name),
                phone = NULLIF(COALESCE($3, phone), ''),
                updated_at = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.phone.as_deref().map(str::trim))
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a member, dropping their crew and job assignments. Returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Crews the member belongs to.
    pub async fn crews(pool: &SqlitePool, member_id: DbId) -> Result<Vec<Crew>, sqlx::Error> {
        sqlx::query_as::<_, Crew>(
            "SELECT c.id, c.name,
                (SELECT COUNT(*) FROM crew_members x WHERE x.crew_id = c.id) AS member_count,
                c.created_at, c.updated_at
             FROM crews c
             JOIN crew_members cm ON cm.crew_id = c.id
             WHERE cm.member_id = $1
             ORDER BY c.name COLLATE NOCASE, c.id",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
    }
}
