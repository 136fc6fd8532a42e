/// Task model and ownership-scoped database operations
///
/// Every read and write here is scoped by `owner_id`. A task that exists but
/// belongs to someone else is indistinguishable from one that does not exist,
/// so callers cannot probe other users' data.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     description TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task};
/// use taskdeck_shared::query::{build_filters, TaskQuery};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, owner, CreateTask {
///     description: "Drink water".to_string(),
///     completed: None,
/// }).await?;
/// assert!(!task.completed);
///
/// let filters = build_filters(&TaskQuery::default());
/// let tasks = Task::list_for_owner(&pool, owner, &filters).await?;
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::query::FilterSpec;

/// A task owned by exactly one user.
///
/// The owner is stamped at creation from the authenticated caller and can
/// never be reassigned.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// What needs doing
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// Owning user
    #[serde(rename = "owner")]
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub description: String,
    /// Defaults to false when absent
    pub completed: Option<bool>,
}

/// Input for updating a task
///
/// `description` and `completed` are the only mutable fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

const TASK_COLUMNS: &str = "id, description, completed, owner_id, created_at, updated_at";

impl Task {
    /// Creates a task for `owner_id`.
    ///
    /// The owner comes from the authenticated caller only; any owner field a
    /// request body might carry never reaches this function.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (description, completed, owner_id)
            VALUES ($1, COALESCE($2, FALSE), $3)
            RETURNING id, description, completed, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.description)
        .bind(data.completed)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Lists tasks for an owner, applying a translated [`FilterSpec`].
    ///
    /// The owner scope is intersected with the optional `completed` match,
    /// then ordering, skip, and limit are applied. Without an explicit sort
    /// the order is creation order, which keeps repeated calls deterministic;
    /// an explicit sort gets an `id` tiebreak for the same reason.
    ///
    /// A filter whose `limit` or `skip` failed to parse (the not-a-number
    /// sentinel) yields an empty list without touching the database.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        filters: &FilterSpec,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (Some(limit), Some(skip)) = (filters.options.limit, filters.options.skip) else {
            return Ok(Vec::new());
        };

        let order_by = match filters.options.sort {
            Some(sort) => format!("{} {}, id", sort.field.as_column(), sort.direction.as_sql()),
            None => "created_at, id".to_string(),
        };

        // order_by is assembled from enum-derived identifiers only
        let sql = format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE owner_id = $1 AND ($2::boolean IS NULL OR completed = $2)
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            TASK_COLUMNS, order_by
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(filters.matching.completed)
            .bind(limit.max(0))
            .bind(skip.max(0))
            .fetch_all(pool)
            .await
    }

    /// Fetches one task, only if it belongs to `owner_id`.
    pub async fn find_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Applies a partial update to an owned task.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` when it does not exist or is not owned by
    /// `owner_id`.
    pub async fn update_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, description, completed, owner_id, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(owner_id)
        .bind(data.description)
        .bind(data.completed)
        .fetch_optional(pool)
        .await
    }

    /// Deletes an owned task, returning the deleted row.
    pub async fn delete_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            RETURNING id, description, completed, owner_id, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }
}
