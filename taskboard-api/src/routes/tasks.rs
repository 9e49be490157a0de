/// Task CRUD endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - List tasks (scoped, filterable, paginated)
/// - `POST /api/tasks` - Create a task (owner forced to the caller)
/// - `GET /api/tasks/:id` - Retrieve one task
/// - `PUT /api/tasks/:id` - Full update
/// - `PATCH /api/tasks/:id` - Partial update
/// - `DELETE /api/tasks/:id` - Delete
///
/// Every query goes through the scoped query layer: regular users only ever
/// see their own tasks, admins see everything. A task outside the caller's
/// scope yields 404 on retrieve, update, and delete alike; the API never
/// reveals that such a task exists.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    pagination::{Page, PageParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::task::{CreateTask, Task, TaskFilter, TaskOrder, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for the task listing
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Filter by completion status
    pub completed: Option<bool>,

    /// Case-insensitive substring search over title and description
    pub search: Option<String>,

    /// Sort field, `-` prefix for descending (`created_at`, `-created_at`,
    /// `updated_at`, `-updated_at`); unknown values fall back to the default
    pub ordering: Option<String>,

    /// Page number (1-based)
    pub page: Option<u32>,

    /// Rows per page (capped)
    pub page_size: Option<u32>,
}

/// Create task request
///
/// There is no owner field: the owner is always the authenticated caller,
/// and any extra fields in the body are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required, non-empty)
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Description (defaults to empty)
    pub description: Option<String>,

    /// Completion flag (defaults to false)
    pub completed: Option<bool>,
}

/// Update task request, shared by PUT and PATCH
///
/// PUT treats missing fields as their defaults (full replacement); PATCH
/// leaves missing fields untouched. Neither can change the owner.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// List tasks visible to the caller
///
/// Scoping is applied before the completion filter, search, and pagination:
/// no parameter combination can surface another user's task.
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks?completed=true&search=report&ordering=-updated_at&page=1
/// Authorization: Bearer <access token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Page<Task>>> {
    let filter = TaskFilter {
        completed: query.completed,
        search: query.search,
        order: query
            .ordering
            .as_deref()
            .and_then(TaskOrder::parse)
            .unwrap_or_default(),
    };
    let params = PageParams::new(query.page, query.page_size);

    let count = Task::count_visible(&state.db, &current_user, &filter).await?;
    let tasks = Task::list_visible(
        &state.db,
        &current_user,
        &filter,
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(Json(Page::new(tasks, count, params)))
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: missing or empty title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description.unwrap_or_default(),
            completed: req.completed.unwrap_or(false),
            owner_id: current_user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Retrieve a single task
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_visible(&state.db, &current_user, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Fully update a task
///
/// Missing optional fields are reset to their defaults; the title is
/// required.
///
/// # Errors
///
/// - `400 Bad Request`: missing or empty title
/// - `404 Not Found`: task missing or owned by another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let title = req.title.ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "title".to_string(),
            message: "Title is required".to_string(),
        }])
    })?;

    let update = UpdateTask {
        title: Some(title),
        description: Some(req.description.unwrap_or_default()),
        completed: Some(req.completed.unwrap_or(false)),
    };

    apply_update(&state, &current_user, id, update).await
}

/// Partially update a task
///
/// Only the supplied fields change.
///
/// # Errors
///
/// - `400 Bad Request`: empty title
/// - `404 Not Found`: task missing or owned by another user
pub async fn patch_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        completed: req.completed,
    };

    apply_update(&state, &current_user, id, update).await
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_visible(&state.db, &current_user, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Runs a scoped update, mapping an invisible task to 404
async fn apply_update(
    state: &AppState,
    current_user: &CurrentUser,
    id: Uuid,
    update: UpdateTask,
) -> ApiResult<Json<Task>> {
    let task = Task::update_visible(&state.db, current_user, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_ignores_owner_field() {
        // Owner is never client-supplied; an owner_id in the body is dropped
        let req: CreateTaskRequest = serde_json::from_value(json!({
            "title": "Finish report",
            "owner_id": "11111111-1111-1111-1111-111111111111"
        }))
        .expect("Unknown fields are ignored");

        assert_eq!(req.title, "Finish report");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_empty_title() {
        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            completed: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_rejects_empty_title() {
        let req = UpdateTaskRequest {
            title: Some(String::new()),
            description: None,
            completed: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_query_ordering() {
        let query: ListTasksQuery =
            serde_json::from_value(json!({ "ordering": "-updated_at" })).unwrap();
        assert_eq!(
            query.ordering.as_deref().and_then(TaskOrder::parse),
            Some(TaskOrder::UpdatedDesc)
        );

        // Unknown fields are not sortable; listing falls back to the default
        let query: ListTasksQuery =
            serde_json::from_value(json!({ "ordering": "owner_id" })).unwrap();
        assert_eq!(query.ordering.as_deref().and_then(TaskOrder::parse), None);
    }

    #[test]
    fn test_update_request_allows_partial_body() {
        let req: UpdateTaskRequest =
            serde_json::from_value(json!({ "completed": true })).unwrap();

        assert!(req.title.is_none());
        assert_eq!(req.completed, Some(true));
        assert!(req.validate().is_ok());
    }
}
