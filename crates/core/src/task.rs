//! Task entity, status lifecycle, DTOs, and lifecycle rules.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, StoreError};
use crate::project::Project;
use crate::store::{ProjectStore, TaskStore};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status of a task through its lifecycle.
///
/// Tasks start `Pending`; `Done` is terminal. The only transition is
/// `Pending -> Done`, performed by [`TaskService::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    /// Return the string representation of a status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
        }
    }

    /// Parse the persisted string representation of a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity and DTOs
// ---------------------------------------------------------------------------

/// A task owned by exactly one project, fixed at creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub project_id: DbId,
    /// The owning project, when loaded alongside the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Box<Project>>,
}

/// DTO for creating a task under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
}

/// DTO for retitling a task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
}

/// Insert shape handed to a [`TaskStore`].
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub project_id: DbId,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Lifecycle rules for tasks.
///
/// Creation and listing are project-scoped; update, completion, and
/// deletion are id-scoped. As with projects, operations are not guarded
/// against concurrent mutation of the same row.
pub struct TaskService {
    projects: Arc<dyn ProjectStore>,
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(projects: Arc<dyn ProjectStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { projects, tasks }
    }

    /// Create a task under an existing, active project.
    pub async fn add_to_project(
        &self,
        project_id: DbId,
        input: CreateTask,
    ) -> Result<Task, CoreError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Project not found".into()))?;
        if !project.is_active {
            return Err(CoreError::PreconditionFailed(
                "Cannot create task on inactive project".into(),
            ));
        }
        let new = NewTask {
            title: input.title,
            project_id,
        };
        Ok(self.tasks.insert(&new).await?)
    }

    /// All tasks of one project with the owning project attached,
    /// newest first.
    pub async fn list_by_project(&self, project_id: DbId) -> Result<Vec<Task>, CoreError> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(CoreError::NotFound("Project not found".into()));
        }
        Ok(self.tasks.list_by_project(project_id).await?)
    }

    /// Look up one task with its owning project attached.
    pub async fn get(&self, id: DbId) -> Result<Task, CoreError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".into()))
    }

    /// Retitle a task. Blocked once the task is DONE, and while the owning
    /// project is inactive; the DONE check is evaluated first.
    pub async fn update(&self, id: DbId, input: UpdateTask) -> Result<Task, CoreError> {
        let mut task = self.get(id).await?;
        if task.status == TaskStatus::Done {
            return Err(CoreError::PreconditionFailed(
                "Cannot edit a DONE task".into(),
            ));
        }
        if !owning_project(&task)?.is_active {
            return Err(CoreError::PreconditionFailed(
                "Cannot modify task of inactive project".into(),
            ));
        }
        task.title = input.title;
        Ok(self.tasks.save(&task).await?)
    }

    /// Transition a task `Pending -> Done`. Not idempotent: completing a
    /// DONE task fails.
    pub async fn complete(&self, id: DbId) -> Result<Task, CoreError> {
        let mut task = self.get(id).await?;
        if task.status == TaskStatus::Done {
            return Err(CoreError::PreconditionFailed("Task is already DONE".into()));
        }
        task.status = TaskStatus::Done;
        Ok(self.tasks.save(&task).await?)
    }

    /// Delete a task. Blocked once the task is DONE.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let task = self.get(id).await?;
        if task.status == TaskStatus::Done {
            return Err(CoreError::PreconditionFailed(
                "Cannot delete a DONE task".into(),
            ));
        }
        Ok(self.tasks.remove(&task).await?)
    }
}

/// The owning project attached by the store. Its absence on a loaded task
/// is a broken storage contract, not a business condition.
fn owning_project(task: &Task) -> Result<&Project, CoreError> {
    task.project.as_deref().ok_or_else(|| {
        CoreError::Storage(StoreError::message(
            "task loaded without its owning project",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::project::{CreateProject, ProjectService, UpdateProject};
    use assert_matches::assert_matches;

    struct Fixture {
        projects: ProjectService,
        tasks: TaskService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone(), store),
        }
    }

    async fn project(fx: &Fixture, name: &str, is_active: Option<bool>) -> Project {
        fx.projects
            .create(CreateProject {
                name: name.into(),
                is_active,
            })
            .await
            .unwrap()
    }

    async fn deactivate(fx: &Fixture, id: DbId) {
        fx.projects
            .update(
                id,
                UpdateProject {
                    name: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
    }

    // -- add_to_project -----------------------------------------------------

    #[tokio::test]
    async fn add_to_missing_project_is_not_found() {
        let fx = fixture();
        let err = fx
            .tasks
            .add_to_project(999, CreateTask { title: "T".into() })
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound(msg) if msg == "Project not found");
    }

    #[tokio::test]
    async fn add_to_inactive_project_fails_and_creates_nothing() {
        let fx = fixture();
        let p = project(&fx, "P", Some(false)).await;
        let err = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Cannot create task on inactive project"
        );

        let listed = fx.tasks.list_by_project(p.id).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn new_task_starts_pending() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.project_id, p.id);
    }

    // -- list_by_project ----------------------------------------------------

    #[tokio::test]
    async fn list_by_missing_project_is_not_found() {
        let fx = fixture();
        let err = fx.tasks.list_by_project(999).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound(msg) if msg == "Project not found");
    }

    #[tokio::test]
    async fn list_by_project_is_newest_first_with_project_attached() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        for title in ["T1", "T2", "T3"] {
            fx.tasks
                .add_to_project(p.id, CreateTask { title: title.into() })
                .await
                .unwrap();
        }

        let listed = fx.tasks.list_by_project(p.id).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["T3", "T2", "T1"]);
        for task in &listed {
            let owner = task.project.as_deref().unwrap();
            assert_eq!(owner.id, p.id);
        }
    }

    // -- get ----------------------------------------------------------------

    #[tokio::test]
    async fn get_missing_task_is_not_found() {
        let fx = fixture();
        let err = fx.tasks.get(999).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound(msg) if msg == "Task not found");
    }

    // -- update -------------------------------------------------------------

    #[tokio::test]
    async fn update_retitles_a_pending_task() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "Old".into() })
            .await
            .unwrap();

        let updated = fx
            .tasks
            .update(task.id, UpdateTask { title: "New".into() })
            .await
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn update_done_task_fails() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        fx.tasks.complete(task.id).await.unwrap();

        let err = fx
            .tasks
            .update(task.id, UpdateTask { title: "New".into() })
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Cannot edit a DONE task"
        );
    }

    #[tokio::test]
    async fn update_task_of_inactive_project_fails() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        deactivate(&fx, p.id).await;

        let err = fx
            .tasks
            .update(task.id, UpdateTask { title: "New".into() })
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Cannot modify task of inactive project"
        );
    }

    #[tokio::test]
    async fn done_check_precedes_inactive_project_check() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        fx.tasks.complete(task.id).await.unwrap();
        deactivate(&fx, p.id).await;

        // A DONE task under an inactive project reports the DONE message.
        let err = fx
            .tasks
            .update(task.id, UpdateTask { title: "New".into() })
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Cannot edit a DONE task"
        );
    }

    // -- complete -----------------------------------------------------------

    #[tokio::test]
    async fn complete_transitions_pending_to_done() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();

        let done = fx.tasks.complete(task.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn complete_is_not_idempotent() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        fx.tasks.complete(task.id).await.unwrap();

        let err = fx.tasks.complete(task.id).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Task is already DONE"
        );
    }

    #[tokio::test]
    async fn complete_ignores_project_activity() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();
        deactivate(&fx, p.id).await;

        // Completion is guarded by task status only.
        let done = fx.tasks.complete(task.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Done);
    }

    // -- delete -------------------------------------------------------------

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let fx = fixture();
        let err = fx.tasks.delete(999).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound(msg) if msg == "Task not found");
    }

    #[tokio::test]
    async fn delete_pending_task_succeeds() {
        let fx = fixture();
        let p = project(&fx, "P", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T".into() })
            .await
            .unwrap();

        fx.tasks.delete(task.id).await.unwrap();
        let err = fx.tasks.get(task.id).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound(_));
    }

    #[tokio::test]
    async fn delete_done_task_fails() {
        let fx = fixture();
        let p = project(&fx, "P1", None).await;
        let task = fx
            .tasks
            .add_to_project(p.id, CreateTask { title: "T1".into() })
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let done = fx.tasks.complete(task.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Done);

        let err = fx.tasks.delete(task.id).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::PreconditionFailed(msg) if msg == "Cannot delete a DONE task"
        );
    }

    // -- status -------------------------------------------------------------

    #[test]
    fn status_round_trips_through_its_string_form() {
        assert_eq!(TaskStatus::parse("PENDING"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("DONE"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("pending"), None);
        assert_eq!(TaskStatus::Pending.as_str(), "PENDING");
        assert_eq!(TaskStatus::Done.to_string(), "DONE");
    }
}
