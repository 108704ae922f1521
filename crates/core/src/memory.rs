//! In-memory store backend.
//!
//! Implements both storage ports over a `RwLock`-guarded table pair.
//! Suitable for tests and local development without a database; the
//! PostgreSQL backend lives in `taskboard-db`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;
use crate::project::{NewProject, Project};
use crate::store::{ProjectStore, TaskStore};
use crate::task::{NewTask, Task, TaskStatus};
use crate::types::{DbId, Timestamp};

/// Relation-free project row, as a database table would hold it.
#[derive(Debug, Clone)]
struct ProjectRow {
    id: DbId,
    name: String,
    is_active: bool,
    created_at: Timestamp,
}

/// Relation-free task row.
#[derive(Debug, Clone)]
struct TaskRow {
    id: DbId,
    title: String,
    status: TaskStatus,
    created_at: Timestamp,
    project_id: DbId,
}

#[derive(Debug)]
struct Inner {
    projects: HashMap<DbId, ProjectRow>,
    tasks: HashMap<DbId, TaskRow>,
    next_project_id: DbId,
    next_task_id: DbId,
}

/// Thread-safe in-memory implementation of [`ProjectStore`] and
/// [`TaskStore`].
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                projects: HashMap::new(),
                tasks: HashMap::new(),
                next_project_id: 1,
                next_task_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    /// Tasks of one project, newest first, without the project attached.
    fn tasks_of(&self, project_id: DbId) -> Vec<Task> {
        let mut rows: Vec<&TaskRow> = self
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows.into_iter().map(|row| materialize_task(row, None)).collect()
    }

    fn materialize_project(&self, row: &ProjectRow) -> Project {
        Project {
            id: row.id,
            name: row.name.clone(),
            is_active: row.is_active,
            created_at: row.created_at,
            tasks: self.tasks_of(row.id),
        }
    }
}

/// A project as attached to a task: the bare row, without its own task
/// set loaded.
fn bare_project(row: &ProjectRow) -> Project {
    Project {
        id: row.id,
        name: row.name.clone(),
        is_active: row.is_active,
        created_at: row.created_at,
        tasks: Vec::new(),
    }
}

fn materialize_task(row: &TaskRow, project: Option<Box<Project>>) -> Task {
    Task {
        id: row.id,
        title: row.title.clone(),
        status: row.status,
        created_at: row.created_at,
        project_id: row.project_id,
        project,
    }
}

/// Map a poisoned lock into the port's storage error.
fn lock_err<T>(err: std::sync::PoisonError<T>) -> StoreError {
    StoreError::message(err.to_string())
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner.projects.get(&id).map(|row| inner.materialize_project(row)))
    }

    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        let mut rows: Vec<&ProjectRow> = inner.projects.values().collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows
            .into_iter()
            .map(|row| inner.materialize_project(row))
            .collect())
    }

    async fn insert(&self, input: &NewProject) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let id = inner.next_project_id;
        inner.next_project_id += 1;
        let row = ProjectRow {
            id,
            name: input.name.clone(),
            is_active: input.is_active,
            created_at: Utc::now(),
        };
        inner.projects.insert(id, row.clone());
        Ok(Project {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
            tasks: Vec::new(),
        })
    }

    async fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let row = inner
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::message(format!("project {} does not exist", project.id)))?;
        row.name = project.name.clone();
        row.is_active = project.is_active;
        let row = row.clone();
        Ok(Project {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
            tasks: project.tasks.clone(),
        })
    }

    async fn remove(&self, project: &Project) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        inner.projects.remove(&project.id);
        // Referential cleanup, as the database FK cascade would do.
        inner.tasks.retain(|_, t| t.project_id != project.id);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner.tasks.get(&id).map(|row| {
            let project = inner
                .projects
                .get(&row.project_id)
                .map(|p| Box::new(bare_project(p)));
            materialize_task(row, project)
        }))
    }

    async fn list_by_project(&self, project_id: DbId) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        let project = inner
            .projects
            .get(&project_id)
            .map(|p| Box::new(bare_project(p)));
        Ok(inner
            .tasks_of(project_id)
            .into_iter()
            .map(|mut task| {
                task.project = project.clone();
                task
            })
            .collect())
    }

    async fn insert(&self, input: &NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let id = inner.next_task_id;
        inner.next_task_id += 1;
        let row = TaskRow {
            id,
            title: input.title.clone(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            project_id: input.project_id,
        };
        inner.tasks.insert(id, row.clone());
        Ok(materialize_task(&row, None))
    }

    async fn save(&self, task: &Task) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let row = inner
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| StoreError::message(format!("task {} does not exist", task.id)))?;
        row.title = task.title.clone();
        row.status = task.status;
        let row = row.clone();
        Ok(materialize_task(&row, task.project.clone()))
    }

    async fn remove(&self, task: &Task) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        inner.tasks.remove(&task.id);
        Ok(())
    }
}
