//! Port interfaces for users, projects, tasks and assignments

use async_trait::async_trait;
use timesync_domain::{
    NewAssignment, NewProject, NewTask, NewUser, Project, ProjectDetails, Result, Task,
    TaskAssignment, TaskDetails, User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, user_id: i64) -> Result<Option<User>>;

    async fn get_all(&self) -> Result<Vec<User>>;

    async fn add(&self, user: NewUser) -> Result<User>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Project with its owner's name.
    async fn get_by_id(&self, project_id: i64) -> Result<Option<ProjectDetails>>;

    async fn get_all(&self) -> Result<Vec<ProjectDetails>>;

    async fn add(&self, project: NewProject) -> Result<Project>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Task with its project and owner names.
    async fn get_by_id(&self, task_id: i64) -> Result<Option<TaskDetails>>;

    async fn get_by_project(&self, project_id: i64) -> Result<Vec<TaskDetails>>;

    async fn add(&self, task: NewTask) -> Result<Task>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn add(&self, assignment: NewAssignment) -> Result<TaskAssignment>;

    /// Whether `user_id` is already assigned to `task_id`.
    async fn exists(&self, user_id: i64, task_id: i64) -> Result<bool>;

    async fn tasks_for_user(&self, user_id: i64) -> Result<Vec<TaskDetails>>;

    async fn users_for_task(&self, task_id: i64) -> Result<Vec<User>>;
}
