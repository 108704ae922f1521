pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                        list, create
/// /projects/{id}                   get, update, delete
/// /projects/{project_id}/tasks     list, create
///
/// /tasks/{id}                      get, update (PATCH), delete
/// /tasks/{id}/complete             complete (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
