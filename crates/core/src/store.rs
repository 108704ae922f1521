//! Storage ports consumed by the lifecycle services.
//!
//! Each service receives its store(s) at construction; there is no global
//! registry. Backends implement these traits: [`crate::memory::MemoryStore`]
//! for tests and local development, `taskboard-db` for PostgreSQL.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::project::{NewProject, Project};
use crate::task::{NewTask, Task};
use crate::types::DbId;

/// Persistence operations for projects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Find a project by id with its live task set attached,
    /// newest task first. `None` if no such project exists.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError>;

    /// All projects with their task sets attached, newest project first.
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    /// Insert a new project. The backend assigns `id` and `created_at`.
    async fn insert(&self, input: &NewProject) -> Result<Project, StoreError>;

    /// Persist the mutable fields of an existing project and return the
    /// persisted entity. Relations on the returned entity are carried over
    /// from the argument. Fails if the row no longer exists.
    async fn save(&self, project: &Project) -> Result<Project, StoreError>;

    /// Remove a project row.
    async fn remove(&self, project: &Project) -> Result<(), StoreError>;
}

/// Persistence operations for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Find a task by id with its owning project attached.
    /// `None` if no such task exists.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError>;

    /// All tasks of one project with the owning project attached,
    /// newest first.
    async fn list_by_project(&self, project_id: DbId) -> Result<Vec<Task>, StoreError>;

    /// Insert a new task. The backend assigns `id` and `created_at`;
    /// newly inserted tasks start in `Pending` status.
    async fn insert(&self, input: &NewTask) -> Result<Task, StoreError>;

    /// Persist the mutable fields of an existing task and return the
    /// persisted entity. Relations on the returned entity are carried over
    /// from the argument. Fails if the row no longer exists.
    async fn save(&self, task: &Task) -> Result<Task, StoreError>;

    /// Remove a task row.
    async fn remove(&self, task: &Task) -> Result<(), StoreError>;
}
