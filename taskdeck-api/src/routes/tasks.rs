/// Task endpoints
///
/// All task routes run behind the bearer-auth layer and are scoped to the
/// authenticated caller. A task that belongs to someone else looks exactly
/// like one that does not exist.
///
/// # Endpoints
///
/// - `POST /tasks` - create a task for the caller
/// - `GET /tasks?completed&limit&skip&sortBy` - filtered, paginated listing
/// - `GET /tasks/:id` / `PATCH /tasks/:id` / `DELETE /tasks/:id`
use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    models::{
        task::{CreateTask, Task, UpdateTask},
        validate_update_keys,
    },
    query::{build_filters, TaskQuery},
};
use uuid::Uuid;

/// Create-task request
///
/// Any `owner` field in the body is ignored; the owner is always the
/// authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub description: String,
    pub completed: Option<bool>,
}

/// Fields accepted by `PATCH /tasks/:id` (after key whitelisting)
#[derive(Debug, Deserialize)]
struct UpdateTaskBody {
    description: Option<String>,
    completed: Option<bool>,
}

const TASK_UPDATE_FIELDS: [&str; 2] = ["description", "completed"];

/// The original treated an undecodable id as an id that matches nothing.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.trim().is_empty() {
        return Err(ApiError::Validation(vec![ValidationErrorDetail {
            field: "description".to_string(),
            message: "Description must not be empty".to_string(),
        }]));
    }
    Ok(())
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: empty description or non-boolean `completed`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_description(&req.description)?;

    let task = Task::create(
        &state.db,
        current.user.id,
        CreateTask {
            description: req.description,
            completed: req.completed,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks
///
/// Raw query parameters go through the filter translator; the repository
/// applies the result on top of the mandatory ownership scope. Malformed
/// `completed` values mean "no filter", malformed `limit`/`skip` values mean
/// an empty listing.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filters = build_filters(&query);
    let tasks = Task::list_for_owner(&state.db, current.user.id, &filters).await?;
    Ok(Json(tasks))
}

/// Fetch one of the caller's tasks.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;

    let task = Task::find_for_owner(&state.db, current.user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

/// Partial task update
///
/// Only `description` and `completed` are mutable; one unknown field rejects
/// the whole request before anything is applied. The owner can never change.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Task>> {
    let map = body
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    validate_update_keys(map, &TASK_UPDATE_FIELDS).map_err(ApiError::BadRequest)?;

    let fields: UpdateTaskBody = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid update body: {}", e)))?;

    if let Some(description) = &fields.description {
        validate_description(description)?;
    }

    let id = parse_task_id(&id)?;

    let task = Task::update_for_owner(
        &state.db,
        current.user.id,
        id,
        UpdateTask {
            description: fields.description,
            completed: fields.completed,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

/// Delete one of the caller's tasks, returning the deleted record.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;

    let task = Task::delete_for_owner(&state.db, current.user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}
