//! Repository for the `jobs` and `job_members` tables.

use chrono::{NaiveDate, Utc};
use landscaper_core::job::{Actuals, JobStatus};
use landscaper_core::error::CoreError;
use landscaper_core::types::{Cents, DbId};
use sqlx::{Sqlite, SqliteExecutor, SqlitePool, Transaction};

use crate::error::{DbError, DbResult};
use crate::models::job::{CompletedJob, CreateJob, Job, UpdateJob};
use crate::models::member::Member;
use crate::repositories::InvoiceRepo;

/// Jobs joined with their client and crew names.
const SELECT_JOBS: &str = "SELECT j.id, j.client_id, c.name AS client_name,
        j.crew_id, cr.name AS crew_name, j.description, j.scheduled_date,
        j.estimated_hours, j.estimated_cost, j.actual_hours, j.actual_cost,
        j.status, j.completed_at, j.on_my_way_sent_at, j.created_at, j.updated_at
     FROM jobs j
     JOIN clients c ON c.id = j.client_id
     LEFT JOIN crews cr ON cr.id = j.crew_id";

const ORDER_UPCOMING: &str = "ORDER BY j.scheduled_date, j.id";
const ORDER_RECENT: &str = "ORDER BY j.scheduled_date DESC, j.id DESC";

/// Provides CRUD and lifecycle operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Schedule a job and assign its members, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO jobs (client_id, crew_id, description, scheduled_date,
                estimated_hours, estimated_cost, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING id",
        )
        .bind(input.client_id)
        .bind(input.crew_id)
        .bind(input.description.trim())
        .bind(input.scheduled_date)
        .bind(input.estimated_hours)
        .bind(input.estimated_cost)
        .bind(JobStatus::Scheduled.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_members(&mut tx, id, &input.member_ids).await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(job)
    }

    /// Insert a scheduled job inside an existing transaction. Used when a
    /// quote is accepted.
    pub(crate) async fn insert_scheduled(
        tx: &mut Transaction<'_, Sqlite>,
        client_id: DbId,
        description: &str,
        scheduled_date: NaiveDate,
        estimated_hours: Option<f64>,
        estimated_cost: Option<Cents>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO jobs (client_id, description, scheduled_date,
                estimated_hours, estimated_cost, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id",
        )
        .bind(client_id)
        .bind(description)
        .bind(scheduled_date)
        .bind(estimated_hours)
        .bind(estimated_cost)
        .bind(JobStatus::Scheduled.as_str())
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
    }

    /// Find a job by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Job>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("{SELECT_JOBS} WHERE j.id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List jobs, most recently scheduled first, optionally filtered by
    /// status.
    pub async fn list(
        pool: &SqlitePool,
        status: Option<JobStatus>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("{SELECT_JOBS} WHERE ($1 IS NULL OR j.status = $1) {ORDER_RECENT}");
        sqlx::query_as::<_, Job>(&query)
            .bind(status.map(JobStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Jobs for one client, most recent first.
    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("{SELECT_JOBS} WHERE j.client_id = $1 {ORDER_RECENT}");
        sqlx::query_as::<_, Job>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Jobs assigned to one crew, most recent first.
    pub async fn list_by_crew(pool: &SqlitePool, crew_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("{SELECT_JOBS} WHERE j.crew_id = $1 {ORDER_RECENT}");
        sqlx::query_as::<_, Job>(&query)
            .bind(crew_id)
            .fetch_all(pool)
            .await
    }

    /// Jobs a member is individually assigned to, most recent first.
    pub async fn list_by_member(
        pool: &SqlitePool,
        member_id: DbId,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "{SELECT_JOBS}
             JOIN job_members jm ON jm.job_id = j.id
             WHERE jm.member_id = $1 {ORDER_RECENT}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }

    /// Jobs scheduled between `from` and `to` inclusive, earliest first.
    pub async fn list_in_range(
        pool: &SqlitePool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "{SELECT_JOBS} WHERE j.scheduled_date BETWEEN $1 AND $2 {ORDER_UPCOMING}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Replace a job's details and assignments.
    ///
    /// Complete jobs are refused. Returns `None` if no row with the given
    /// `id` exists.
    pub async fn update(pool: &SqlitePool, id: DbId, input: &UpdateJob) -> DbResult<Option<Job>> {
        let mut tx = pool.begin().await?;
        let Some(existing) = Self::find_by_id(&mut *tx, id).await? else {
            return Ok(None);
        };
        existing.status.ensure_editable()?;

        sqlx::query(
            "UPDATE jobs SET
                client_id = $2,
                crew_id = $3,
                description = $4,
                scheduled_date = $5,
                estimated_hours = $6,
                estimated_cost = $7,
                updated_at = $8
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.client_id)
        .bind(input.crew_id)
        .bind(input.description.trim())
        .bind(input.scheduled_date)
        .bind(input.estimated_hours)
        .bind(input.estimated_cost)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        Self::replace_members(&mut tx, id, &input.member_ids).await?;

        let job = Self::find_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(job)
    }

    /// Delete a job with its tasks, assignments and invoice. Returns `true`
    /// if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Members individually assigned to a job.
    pub async fn members(pool: &SqlitePool, job_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            "SELECT m.id, m.name, m.phone, m.created_at, m.updated_at
             FROM members m
             JOIN job_members jm ON jm.member_id = m.id
             WHERE jm.job_id = $1
             ORDER BY m.name COLLATE NOCASE, m.id",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    async fn replace_members(
        tx: &mut Transaction<'_, Sqlite>,
        job_id: DbId,
        member_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM job_members WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut **tx)
            .await?;
        for member_id in member_ids {
            sqlx::query(
                "INSERT INTO job_members (job_id, member_id) VALUES ($1, $2)
                 ON CONFLICT (job_id, member_id) DO NOTHING",
            )
            .bind(job_id)
            .bind(member_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Scheduled -> In Progress.
    pub async fn start(pool: &SqlitePool, id: DbId) -> DbResult<Job> {
        Self::transition(pool, id, JobStatus::start).await
    }

    /// Scheduled | In Progress -> Cancelled.
    pub async fn cancel(pool: &SqlitePool, id: DbId) -> DbResult<Job> {
        Self::transition(pool, id, JobStatus::cancel).await
    }

    async fn transition(
        pool: &SqlitePool,
        id: DbId,
        rule: fn(JobStatus) -> Result<JobStatus, CoreError>,
    ) -> DbResult<Job> {
        let mut tx = pool.begin().await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        let from = job.status;
        let next = rule(from)?;

        sqlx::query("UPDATE jobs SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        tx.commit().await?;

        tracing::info!(job_id = id, from = %from, to = %next, "Job status changed");
        Ok(job)
    }

    /// Record actuals, mark the job Complete and raise an Unsent invoice
    /// for the actual cost when it is positive and the job has none yet.
    ///
    /// A job that is already Complete fails with `AlreadyCompleted` and is
    /// left untouched.
    pub async fn complete(pool: &SqlitePool, id: DbId, actuals: &Actuals) -> DbResult<CompletedJob> {
        let mut tx = pool.begin().await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        let next = job.status.complete()?;
        actuals.validate()?;

        let now = Utc::now();
        sqlx::query(
            "UPDATE jobs SET status = $2, actual_hours = $3, actual_cost = $4,
                completed_at = $5, updated_at = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(next.as_str())
        .bind(actuals.hours)
        .bind(actuals.cost)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut invoice_id = None;
        if let Some(total) = actuals.invoice_total() {
            if InvoiceRepo::find_by_job(&mut *tx, id).await?.is_none() {
                invoice_id = Some(InvoiceRepo::insert_unsent(&mut tx, id, total).await?);
            }
        }

        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        let invoice = match invoice_id {
            Some(invoice_id) => InvoiceRepo::find_by_id(&mut *tx, invoice_id).await?,
            None => None,
        };
        tx.commit().await?;

        tracing::info!(
            job_id = id,
            actual_hours = actuals.hours,
            actual_cost = actuals.cost,
            invoice_id = ?invoice.as_ref().map(|i| i.id),
            "Job completed",
        );
        Ok(CompletedJob { job, invoice })
    }

    /// Stamp the time the customer was told the crew is on the way.
    pub async fn notify_on_my_way(pool: &SqlitePool, id: DbId) -> DbResult<Job> {
        let mut tx = pool.begin().await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        job.status.ensure_open()?;

        let now = Utc::now();
        sqlx::query("UPDATE jobs SET on_my_way_sent_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        let job = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("job", id))?;
        tx.commit().await?;

        tracing::info!(job_id = id, client = %job.client_name, "On-my-way notice recorded");
        Ok(job)
    }
}
