//! Repository for the `quotes` and `quote_line_items` tables.

use chrono::{NaiveDate, Utc};
use landscaper_core::error::CoreError;
use landscaper_core::money::line_total;
use landscaper_core::quote::{quote_total, QuoteStatus};
use landscaper_core::types::{Cents, DbId};
use sqlx::{Sqlite, SqliteExecutor, SqlitePool, Transaction};

use crate::error::{DbError, DbResult};
use crate::models::quote::{
    AcceptedQuote, CreateLineItem, CreateQuote, Quote, QuoteLineItem, UpdateQuote,
};
use crate::repositories::{JobRepo, TaskRepo};

const SELECT_QUOTES: &str = "SELECT q.id, q.client_id, c.name AS client_name, q.description,
        q.estimated_hours, q.total, q.status, q.valid_until, q.job_id,
        q.created_at, q.updated_at
     FROM quotes q
     JOIN clients c ON c.id = q.client_id";

const LINE_ITEM_COLUMNS: &str =
    "id, quote_id, description, quantity, unit_price, line_total, created_at";

/// Provides CRUD, line item and lifecycle operations for quotes.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Draft a quote with its initial line items. The total is the sum of
    /// the line totals.
    pub async fn create(pool: &SqlitePool, input: &CreateQuote) -> DbResult<Quote> {
        let priced = input
            .line_items
            .iter()
            .map(|item| Ok((item, line_total(item.quantity, item.unit_price)?)))
            .collect::<Result<Vec<_>, CoreError>>()?;
        let total = quote_total(priced.iter().map(|(_, t)| *t));

        let mut tx = pool.begin().await?;
        let now = Utc::now();
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO quotes (client_id, description, estimated_hours, total, status,
                valid_until, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id",
        )
        .bind(input.client_id)
        .bind(input.description.trim())
        .bind(input.estimated_hours)
        .bind(total)
        .bind(QuoteStatus::Draft.as_str())
        .bind(input.valid_until)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for (item, amount) in &priced {
            Self::insert_line_item(&mut tx, id, item, *amount).await?;
        }

        let quote = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", id))?;
        tx.commit().await?;

        tracing::info!(quote_id = id, client_id = input.client_id, total, "Quote drafted");
        Ok(quote)
    }

    /// Find a quote by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Quote>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("{SELECT_QUOTES} WHERE q.id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List quotes, newest first, optionally filtered by status.
    pub async fn list(
        pool: &SqlitePool,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>, sqlx::Error> {
        let query = format!(
            "{SELECT_QUOTES} WHERE ($1 IS NULL OR q.status = $1) ORDER BY q.created_at DESC, q.id DESC"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(status.map(QuoteStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Quotes for one client, newest first.
    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<Quote>, sqlx::Error> {
        let query = format!(
            "{SELECT_QUOTES} WHERE q.client_id = $1 ORDER BY q.created_at DESC, q.id DESC"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Edit a draft quote. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateQuote,
    ) -> DbResult<Option<Quote>> {
        let mut tx = pool.begin().await?;
        let Some(existing) = Self::find_by_id(&mut *tx, id).await? else {
            return Ok(None);
        };
        existing.status.ensure_editable()?;

        sqlx::query(
            "UPDATE quotes SET
                description = COALESCE($2, description),
                estimated_hours = CASE WHEN $3 THEN $4 ELSE estimated_hours END,
                valid_until = CASE WHEN $5 THEN $6 ELSE valid_until END,
                updated_at = $7
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.estimated_hours.is_some())
        .bind(input.estimated_hours.flatten())
        .bind(input.valid_until.is_some())
        .bind(input.valid_until.flatten())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let quote = Self::find_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(quote)
    }

    /// Delete a quote and its line items. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Line items
    // -----------------------------------------------------------------------

    /// Line items of a quote in entry order.
    pub async fn line_items<'e, E>(
        executor: E,
        quote_id: DbId,
    ) -> Result<Vec<QuoteLineItem>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM quote_line_items WHERE quote_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(quote_id)
            .fetch_all(executor)
            .await
    }

    /// Add a line item to a draft quote and refresh its total.
    pub async fn add_line_item(
        pool: &SqlitePool,
        quote_id: DbId,
        input: &CreateLineItem,
    ) -> DbResult<QuoteLineItem> {
        let amount = line_total(input.quantity, input.unit_price)?;

        let mut tx = pool.begin().await?;
        let quote = Self::find_by_id(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", quote_id))?;
        quote.status.ensure_editable()?;

        let item_id = Self::insert_line_item(&mut tx, quote_id, input, amount).await?;
        Self::refresh_total(&mut tx, quote_id).await?;

        let query = format!("SELECT {LINE_ITEM_COLUMNS} FROM quote_line_items WHERE id = $1");
        let item = sqlx::query_as::<_, QuoteLineItem>(&query)
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(item)
    }

    /// Remove a line item from a draft quote and refresh its total.
    /// Returns `false` if the item does not belong to the quote.
    pub async fn delete_line_item(
        pool: &SqlitePool,
        quote_id: DbId,
        item_id: DbId,
    ) -> DbResult<bool> {
        let mut tx = pool.begin().await?;
        let quote = Self::find_by_id(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", quote_id))?;
        quote.status.ensure_editable()?;

        let result = sqlx::query("DELETE FROM quote_line_items WHERE id = $1 AND quote_id = $2")
            .bind(item_id)
            .bind(quote_id)
            .execute(&mut *tx)
            .await?;
        Self::refresh_total(&mut tx, quote_id).await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_line_item(
        tx: &mut Transaction<'_, Sqlite>,
        quote_id: DbId,
        item: &CreateLineItem,
        amount: Cents,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO quote_line_items (quote_id, description, quantity, unit_price,
                line_total, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(quote_id)
        .bind(item.description.trim())
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(amount)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
    }

    async fn refresh_total(
        tx: &mut Transaction<'_, Sqlite>,
        quote_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE quotes SET
                total = (SELECT COALESCE(SUM(line_total), 0) FROM quote_line_items WHERE quote_id = $1),
                updated_at = $2
             WHERE id = $1",
        )
        .bind(quote_id)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Draft -> Sent.
    pub async fn send(pool: &SqlitePool, id: DbId) -> DbResult<Quote> {
        Self::transition(pool, id, QuoteStatus::send).await
    }

    /// Draft | Sent -> Declined. No job is created.
    pub async fn decline(pool: &SqlitePool, id: DbId) -> DbResult<Quote> {
        Self::transition(pool, id, QuoteStatus::decline).await
    }

    async fn transition(
        pool: &SqlitePool,
        id: DbId,
        rule: fn(QuoteStatus) -> Result<QuoteStatus, CoreError>,
    ) -> DbResult<Quote> {
        let mut tx = pool.begin().await?;
        let quote = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", id))?;
        let from = quote.status;
        let next = rule(from)?;

        sqlx::query("UPDATE quotes SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        let quote = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", id))?;
        tx.commit().await?;

        tracing::info!(quote_id = id, from = %from, to = %next, "Quote status changed");
        Ok(quote)
    }

    /// Accept a Draft or Sent quote and create its job in one transaction.
    ///
    /// The job is Scheduled on `scheduled_date` for the quote's client, with
    /// the quote's description, estimated hours and total as estimated cost.
    /// Each line item becomes a task. Accepting twice fails with
    /// `InvalidTransition` and creates nothing.
    pub async fn accept(
        pool: &SqlitePool,
        id: DbId,
        scheduled_date: NaiveDate,
    ) -> DbResult<AcceptedQuote> {
        let mut tx = pool.begin().await?;
        let quote = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", id))?;
        let next = quote.status.accept()?;

        let job_id = JobRepo::insert_scheduled(
            &mut tx,
            quote.client_id,
            &quote.description,
            scheduled_date,
            quote.estimated_hours,
            Some(quote.total),
        )
        .await?;
        for item in Self::line_items(&mut *tx, id).await? {
            TaskRepo::insert(&mut tx, job_id, &item.description).await?;
        }

        sqlx::query("UPDATE quotes SET status = $2, job_id = $3, updated_at = $4 WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .bind(job_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let quote = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("quote", id))?;
        let job = JobRepo::find_by_id(&mut *tx, job_id)
            .await?
            .ok_or_else(|| DbError::not_found("job", job_id))?;
        tx.commit().await?;

        tracing::info!(quote_id = id, job_id, total = quote.total, "Quote accepted");
        Ok(AcceptedQuote { quote, job })
    }
}
