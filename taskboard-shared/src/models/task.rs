/// Task model, database operations, and the scoped query layer
///
/// Tasks are the core resource of TaskBoard. Every task is owned by exactly
/// one user; ownership is assigned at creation and never reassigned.
///
/// All read and mutation queries in this module are *scoped*: they take the
/// acting user and restrict the visible row set to that user's tasks before
/// any filtering, searching, or pagination happens (admins are unrestricted).
/// A task outside the actor's scope behaves exactly as if it did not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::middleware::CurrentUser;
/// use taskboard_shared::models::task::{CreateTask, Task, TaskFilter};
/// use taskboard_shared::models::user::UserRole;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let actor = CurrentUser { id: user_id, role: UserRole::User };
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Finish report".to_string(),
///     description: "Q4 summary".to_string(),
///     completed: false,
///     owner_id: actor.id,
/// }).await?;
///
/// // Only the owner (or an admin) can see it
/// let visible = Task::find_visible(&pool, &actor, task.id).await?;
/// assert!(visible.is_some());
///
/// let mine = Task::list_visible(&pool, &actor, &TaskFilter::default(), 10, 0).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::middleware::CurrentUser;

/// Task model representing a to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Title (required, non-empty)
    pub title: String,

    /// Free-form description (defaults to empty)
    pub description: String,

    /// Completion flag
    pub completed: bool,

    /// Owning user; set server-side at creation, immutable afterwards
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (refreshed on every update)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title (required)
    pub title: String,

    /// Description (empty string if omitted by the caller)
    pub description: String,

    /// Initial completion flag
    pub completed: bool,

    /// Owner: always the authenticated caller, never client-supplied
    pub owner_id: Uuid,
}

/// Input for updating an existing task
///
/// All fields are optional; only non-None fields are written. There is
/// deliberately no owner field here: ownership cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Filter parameters for task listings
///
/// Applied *after* owner scoping, never instead of it.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks with this completion state
    pub completed: Option<bool>,

    /// Case-insensitive substring match over title and description
    ///
    /// Matched literally: LIKE metacharacters in the term are escaped before
    /// the query runs.
    pub search: Option<String>,

    /// Sort order for the listing
    pub order: TaskOrder,
}

/// Sort order for task listings
///
/// Wire format is the field name with an optional `-` prefix for descending,
/// e.g. `ordering=-updated_at`. Only `created_at` and `updated_at` are
/// sortable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskOrder {
    /// Newest first (the default)
    #[default]
    CreatedDesc,

    /// Oldest first
    CreatedAsc,

    /// Most recently updated first
    UpdatedDesc,

    /// Least recently updated first
    UpdatedAsc,
}

impl TaskOrder {
    /// Parses the wire format; unknown fields yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created_at" => Some(TaskOrder::CreatedAsc),
            "-created_at" => Some(TaskOrder::CreatedDesc),
            "updated_at" => Some(TaskOrder::UpdatedAsc),
            "-updated_at" => Some(TaskOrder::UpdatedDesc),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            TaskOrder::CreatedDesc => "created_at DESC",
            TaskOrder::CreatedAsc => "created_at ASC",
            TaskOrder::UpdatedDesc => "updated_at DESC",
            TaskOrder::UpdatedAsc => "updated_at ASC",
        }
    }
}

/// Escapes LIKE metacharacters so a search term matches literally
///
/// Without this, `%` and `_` in the term act as wildcards: searching for
/// `a_c` would match "abc".
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Returns the owner restriction for an actor
///
/// `None` means unrestricted (admins see every task); `Some(id)` restricts
/// all queries to tasks owned by `id`. This is bound into every query below
/// before completion filters, search, ordering, and pagination apply, so
/// cross-tenant rows never reach those stages.
pub fn visible_owner(actor: &CurrentUser) -> Option<Uuid> {
    if actor.role.is_admin() {
        None
    } else {
        Some(actor.id)
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, completed, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, completed, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID within the actor's scope
    ///
    /// Returns `None` both when the task does not exist and when it belongs
    /// to another user: callers cannot distinguish the two cases.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_visible(
        pool: &PgPool,
        actor: &CurrentUser,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
              AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(visible_owner(actor))
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks visible to the actor in the filter's order
    ///
    /// The owner scope is applied before the completion filter and search, so
    /// no combination of filter parameters widens the visible set. The ORDER
    /// BY clause comes from [`TaskOrder::as_sql`], never from client input.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_visible(
        pool: &PgPool,
        actor: &CurrentUser,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT id, title, description, completed, owner_id, created_at, updated_at
            FROM tasks
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::boolean IS NULL OR completed = $2)
              AND ($3::text IS NULL
                   OR title ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            filter.order.as_sql()
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(visible_owner(actor))
            .bind(filter.completed)
            .bind(filter.search.as_deref().map(escape_like))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts tasks visible to the actor under the given filter
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count_visible(
        pool: &PgPool,
        actor: &CurrentUser,
        filter: &TaskFilter,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::boolean IS NULL OR completed = $2)
              AND ($3::text IS NULL
                   OR title ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(visible_owner(actor))
        .bind(filter.completed)
        .bind(filter.search.as_deref().map(escape_like))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates a task within the actor's scope
    ///
    /// Only non-None fields in `data` are written; `updated_at` is refreshed.
    /// Returns `None` when the task is missing *or* invisible to the actor,
    /// so a non-owner update attempt is indistinguishable from a missing row.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn update_visible(
        pool: &PgPool,
        actor: &CurrentUser,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2) \
             RETURNING id, title, description, completed, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(visible_owner(actor));

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task within the actor's scope
    ///
    /// Returns true if a visible task was deleted, false when the task is
    /// missing or owned by someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete_visible(
        pool: &PgPool,
        actor: &CurrentUser,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1
              AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(visible_owner(actor))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn actor(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_visible_owner_admin_unrestricted() {
        let admin = actor(UserRole::Admin);
        assert_eq!(visible_owner(&admin), None);
    }

    #[test]
    fn test_visible_owner_user_scoped_to_self() {
        let user = actor(UserRole::User);
        assert_eq!(visible_owner(&user), Some(user.id));
    }

    #[test]
    fn test_visible_owner_never_another_user() {
        let a = actor(UserRole::User);
        let b = actor(UserRole::User);
        assert_ne!(visible_owner(&a), visible_owner(&b));
    }

    #[test]
    fn test_update_task_default_is_noop() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.completed.is_none());
    }

    #[test]
    fn test_filter_default_is_unfiltered() {
        let filter = TaskFilter::default();
        assert!(filter.completed.is_none());
        assert!(filter.search.is_none());
        assert_eq!(filter.order, TaskOrder::CreatedDesc);
    }

    #[test]
    fn test_escape_like_metacharacters() {
        // Wildcards in the search term must match themselves, not anything
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_c"), "a\\_c");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain words"), "plain words");
    }

    #[test]
    fn test_order_parse_wire_format() {
        assert_eq!(TaskOrder::parse("created_at"), Some(TaskOrder::CreatedAsc));
        assert_eq!(TaskOrder::parse("-created_at"), Some(TaskOrder::CreatedDesc));
        assert_eq!(TaskOrder::parse("updated_at"), Some(TaskOrder::UpdatedAsc));
        assert_eq!(TaskOrder::parse("-updated_at"), Some(TaskOrder::UpdatedDesc));

        // Only whitelisted columns are sortable
        assert_eq!(TaskOrder::parse("owner_id"), None);
        assert_eq!(TaskOrder::parse("title; DROP TABLE tasks"), None);
        assert_eq!(TaskOrder::parse(""), None);
    }
}
