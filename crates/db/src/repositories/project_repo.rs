//! Repository for the `projects` table.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use taskboard_core::error::StoreError;
use taskboard_core::project::{NewProject, Project};
use taskboard_core::store::ProjectStore;
use taskboard_core::task::Task;
use taskboard_core::types::DbId;

use crate::models::project::ProjectRow;
use crate::models::task::TaskRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_active, created_at";
const TASK_COLUMNS: &str = "id, title, status, created_at, project_id";

/// PostgreSQL implementation of [`ProjectStore`].
pub struct ProjectRepo {
    pool: PgPool,
}

impl ProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tasks of one project, newest first, without the project attached.
    async fn tasks_of(&self, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|row| row.into_task(None)).collect()
    }
}

#[async_trait]
impl ProjectStore for ProjectRepo {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::new)?;
        match row {
            Some(row) => {
                let tasks = self.tasks_of(id).await.map_err(StoreError::new)?;
                Ok(Some(row.into_project(tasks)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::new)?;

        // One pass over all tasks, bucketed by project, keeps listing at
        // two queries regardless of project count.
        let task_query =
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC");
        let task_rows = sqlx::query_as::<_, TaskRow>(&task_query)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::new)?;

        let mut by_project: HashMap<DbId, Vec<Task>> = HashMap::new();
        for row in task_rows {
            let project_id = row.project_id;
            let task = row.into_task(None).map_err(StoreError::new)?;
            by_project.entry(project_id).or_default().push(task);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tasks = by_project.remove(&row.id).unwrap_or_default();
                row.into_project(tasks)
            })
            .collect())
    }

    async fn insert(&self, input: &NewProject) -> Result<Project, StoreError> {
        let query =
            format!("INSERT INTO projects (name, is_active) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::new)?;
        Ok(row.into_project(Vec::new()))
    }

    async fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let query = format!(
            "UPDATE projects SET name = $2, is_active = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project.id)
            .bind(&project.name)
            .bind(project.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::new)?;
        Ok(row.into_project(project.tasks.clone()))
    }

    async fn remove(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project.id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::new)?;
        Ok(())
    }
}
