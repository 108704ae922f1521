use std::sync::Arc;

use taskboard_core::project::ProjectService;
use taskboard_core::task::TaskService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (used by the health check).
    pub pool: taskboard_db::DbPool,
    /// Project lifecycle service.
    pub projects: Arc<ProjectService>,
    /// Task lifecycle service.
    pub tasks: Arc<TaskService>,
}
