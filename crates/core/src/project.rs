//! Project entity, DTOs, and lifecycle rules.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::store::ProjectStore;
use crate::task::Task;
use crate::types::{DbId, Timestamp};

/// A project owning a set of tasks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    /// Live tasks referencing this project, newest first.
    pub tasks: Vec<Task>,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Defaults to `true` when omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Insert shape handed to a [`ProjectStore`], with defaults resolved.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub is_active: bool,
}

/// Lifecycle rules for projects.
///
/// Operations load current state from the store, evaluate invariants, and
/// persist on success. No versioning or locking: concurrent mutation of the
/// same row is assumed to be serialized by the caller's deployment.
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// All projects with their tasks attached, newest first.
    pub async fn list(&self) -> Result<Vec<Project>, CoreError> {
        Ok(self.store.list().await?)
    }

    /// Look up one project with its tasks attached.
    pub async fn get(&self, id: DbId) -> Result<Project, CoreError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Project not found".into()))
    }

    /// Create and persist a new project. `is_active` defaults to `true`.
    pub async fn create(&self, input: CreateProject) -> Result<Project, CoreError> {
        let new = NewProject {
            name: input.name,
            is_active: input.is_active.unwrap_or(true),
        };
        Ok(self.store.insert(&new).await?)
    }

    /// Apply the supplied field changes to an existing project.
    pub async fn update(&self, id: DbId, input: UpdateProject) -> Result<Project, CoreError> {
        let mut project = self.get(id).await?;
        if let Some(name) = input.name {
            project.name = name;
        }
        if let Some(is_active) = input.is_active {
            project.is_active = is_active;
        }
        Ok(self.store.save(&project).await?)
    }

    /// Delete a project. A project that still owns tasks cannot be deleted.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let project = self.get(id).await?;
        if !project.tasks.is_empty() {
            return Err(CoreError::PreconditionFailed(
                "Cannot delete project with tasks".into(),
            ));
        }
        Ok(self.store.remove(&project).await?)
    }
}
