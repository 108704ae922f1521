//! Task row model.

use sqlx::FromRow;
use taskboard_core::project::Project;
use taskboard_core::task::{Task, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table. `status` stays in its persisted text
/// form until conversion.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub title: String,
    pub status: String,
    pub created_at: Timestamp,
    pub project_id: DbId,
}

impl TaskRow {
    /// Materialize the domain entity, optionally attaching the owning
    /// project. Fails if the persisted status text is not a known status.
    pub fn into_task(self, project: Option<Project>) -> Result<Task, sqlx::Error> {
        let status = TaskStatus::parse(&self.status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: format!("unknown task status: {}", self.status).into(),
        })?;
        Ok(Task {
            id: self.id,
            title: self.title,
            status,
            created_at: self.created_at,
            project_id: self.project_id,
            project: project.map(Box::new),
        })
    }
}
