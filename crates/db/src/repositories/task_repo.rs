//! Repository for the `tasks` table.

use chrono::Utc;
use landscaper_core::types::DbId;
use sqlx::{Sqlite, SqliteExecutor, SqlitePool, Transaction};

use crate::models::task::{CreateTask, Task};

const COLUMNS: &str = "id, job_id, description, completed, created_at";

/// Provides operations on a job's task checklist.
pub struct TaskRepo;

impl TaskRepo {
    /// Tasks of a job in creation order.
    pub async fn list_by_job<'e, E>(executor: E, job_id: DbId) -> Result<Vec<Task>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE job_id = $1 ORDER BY id");
        sqlx::query_as::<_, Task>(&query)
            .bind(job_id)
            .fetch_all(executor)
            .await
    }

    /// Add an open task to a job.
    pub async fn create(
        pool: &SqlitePool,
        job_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (job_id, description, completed, created_at)
             VALUES ($1, $2, 0, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(job_id)
            .bind(input.description.trim())
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Insert a task inside an existing transaction.
    pub(crate) async fn insert(
        tx: &mut Transaction<'_, Sqlite>,
        job_id: DbId,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tasks (job_id, description, completed, created_at) VALUES ($1, $2, 0, $3)",
        )
        .bind(job_id)
        .bind(description)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Flip a task's completed flag. Returns `None` if the task does not
    /// belong to the job.
    pub async fn toggle(
        pool: &SqlitePool,
        job_id: DbId,
        task_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET completed = 1 - completed
             WHERE id = $1 AND job_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task from a job. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, job_id: DbId, task_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND job_id = $2")
            .bind(task_id)
            .bind(job_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
