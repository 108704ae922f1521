//! Project row model.

use sqlx::FromRow;
use taskboard_core::project::Project;
use taskboard_core::task::Task;
use taskboard_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl ProjectRow {
    /// Materialize the domain entity with the given task set attached.
    pub fn into_project(self, tasks: Vec<Task>) -> Project {
        Project {
            id: self.id,
            name: self.name,
            is_active: self.is_active,
            created_at: self.created_at,
            tasks,
        }
    }
}
