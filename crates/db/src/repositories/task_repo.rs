//! Repository for the `tasks` table.

use async_trait::async_trait;
use sqlx::PgPool;
use taskboard_core::error::StoreError;
use taskboard_core::project::Project;
use taskboard_core::store::TaskStore;
use taskboard_core::task::{NewTask, Task};
use taskboard_core::types::DbId;

use crate::models::project::ProjectRow;
use crate::models::task::TaskRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, status, created_at, project_id";
const PROJECT_COLUMNS: &str = "id, name, is_active, created_at";

/// PostgreSQL implementation of [`TaskStore`].
pub struct TaskRepo {
    pool: PgPool,
}

impl TaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The bare owning-project row, without its own task set loaded.
    async fn owning_project(&self, project_id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.into_project(Vec::new())))
    }
}

#[async_trait]
impl TaskStore for TaskRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::new)?;
        match row {
            Some(row) => {
                let project = self
                    .owning_project(row.project_id)
                    .await
                    .map_err(StoreError::new)?;
                Ok(Some(row.into_task(project).map_err(StoreError::new)?))
            }
            None => Ok(None),
        }
    }

    async fn list_by_project(&self, project_id: DbId) -> Result<Vec<Task>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::new)?;
        let project = self
            .owning_project(project_id)
            .await
            .map_err(StoreError::new)?;
        rows.into_iter()
            .map(|row| row.into_task(project.clone()).map_err(StoreError::new))
            .collect()
    }

    async fn insert(&self, input: &NewTask) -> Result<Task, StoreError> {
        // `status` takes the table default, PENDING.
        let query =
            format!("INSERT INTO tasks (title, project_id) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(&input.title)
            .bind(input.project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::new)?;
        row.into_task(None).map_err(StoreError::new)
    }

    async fn save(&self, task: &Task) -> Result<Task, StoreError> {
        let query =
            format!("UPDATE tasks SET title = $2, status = $3 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(task.id)
            .bind(&task.title)
            .bind(task.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::new)?;
        row.into_task(task.project.as_deref().cloned())
            .map_err(StoreError::new)
    }

    async fn remove(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task.id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::new)?;
        Ok(())
    }
}
