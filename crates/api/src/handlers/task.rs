//! Handlers for tasks.
//!
//! Creation and listing are project-scoped under
//! `/projects/{project_id}/tasks`; update, completion, and deletion are
//! id-scoped under `/tasks/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::task::{CreateTask, Task, UpdateTask};
use taskboard_core::types::DbId;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/tasks
pub async fn add_to_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    let task = state.tasks.add_to_project(project_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/projects/{project_id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list_by_project(project_id).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Task>> {
    let task = state.tasks.get(id).await?;
    Ok(Json(task))
}

/// PATCH /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    let task = state.tasks.update(id, input).await?;
    Ok(Json(task))
}

/// POST /api/v1/tasks/{id}/complete
pub async fn complete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Task>> {
    let task = state.tasks.complete(id).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
