//! Repository for the `clients` table.

use chrono::Utc;
use landscaper_core::error::CoreError;
use landscaper_core::types::DbId;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DbError, DbResult};
use crate::models::client::{Client, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, phone, email, notes, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO clients (name, address, phone, email, notes, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Client>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all clients alphabetically.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY name COLLATE NOCASE, id");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// Update a client. Only non-`None` fields in `input` are applied; an
    /// empty string clears an optional field.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                address = NULLIF(COALESCE($3, address), ''),
                phone = NULLIF(COALESCE($4, phone), ''),
                email = NULLIF(COALESCE($5, email), ''),
                notes = NULLIF(COALESCE($6, notes), ''),
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a client together with its quotes.
    ///
    /// Refused with a conflict while the client still has jobs. Returns
    /// `false` if no row with the given `id` exists.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let job_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE client_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if job_count > 0 {
            return Err(DbError::Core(CoreError::Conflict(format!(
                "Client has {job_count} job(s); delete or reassign them first"
            ))));
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
