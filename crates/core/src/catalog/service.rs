//! Catalog services - users, projects, tasks and assignments

use std::sync::Arc;

use timesync_domain::{
    NewAssignment, NewProject, NewTask, NewUser, Project, ProjectDetails, Result, Task,
    TaskAssignment, TaskDetails, TimeSyncError, User,
};
use tracing::{info, warn};

use super::ports::{AssignmentRepository, ProjectRepository, TaskRepository, UserRepository};

/// User management
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Service over the user store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Validate and store a new user.
    pub async fn add_user(&self, user: NewUser) -> Result<User> {
        user.validate()?;
        let created = self.users.add(user).await?;
        info!(user_id = created.user_id, "Created user");
        Ok(created)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        self.users.get_by_id(user_id).await?.ok_or_else(|| user_not_found(user_id))
    }

    /// All users ordered by id.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.get_all().await
    }
}

/// Project management
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { projects, users }
    }

    /// Create a project owned by an existing user.
    pub async fn add_project(&self, project: NewProject) -> Result<Project> {
        project.validate()?;
        require_user(self.users.as_ref(), project.user_id).await?;

        let created = self.projects.add(project).await?;
        info!(project_id = created.project_id, user_id = created.user_id, "Created project");
        Ok(created)
    }

    /// Project with its owner name.
    pub async fn get_project(&self, project_id: i64) -> Result<ProjectDetails> {
        self.projects
            .get_by_id(project_id)
            .await?
            .ok_or_else(|| {
                TimeSyncError::NotFound(format!("Project with ID {project_id} not found"))
            })
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectDetails>> {
        self.projects.get_all().await
    }
}

/// Task management
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { tasks, projects, users }
    }

    /// Add a task to an existing project on behalf of an existing user.
    pub async fn add_task(&self, task: NewTask) -> Result<Task> {
        task.validate()?;
        if self.projects.get_by_id(task.project_id).await?.is_none() {
            return Err(TimeSyncError::NotFound(format!(
                "Project with ID {} not found",
                task.project_id
            )));
        }
        require_user(self.users.as_ref(), task.user_id).await?;

        let created = self.tasks.add(task).await?;
        info!(task_id = created.task_id, project_id = created.project_id, "Created task");
        Ok(created)
    }

    /// Task with its project and owner names.
    pub async fn get_task(&self, task_id: i64) -> Result<TaskDetails> {
        self.tasks.get_by_id(task_id).await?.ok_or_else(|| task_not_found(task_id))
    }

    /// Tasks of an existing project.
    pub async fn tasks_for_project(&self, project_id: i64) -> Result<Vec<TaskDetails>> {
        self.tasks.get_by_project(project_id).await
    }
}

/// Task-to-user assignments
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        tasks: Arc<dyn TaskRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { assignments, tasks, users }
    }

    /// Assign a task to a user. Assigning the same pair twice is rejected.
    pub async fn assign_task(&self, assignment: NewAssignment) -> Result<TaskAssignment> {
        require_user(self.users.as_ref(), assignment.user_id).await?;
        if self.tasks.get_by_id(assignment.task_id).await?.is_none() {
            return Err(task_not_found(assignment.task_id));
        }

        if self.assignments.exists(assignment.user_id, assignment.task_id).await? {
            warn!(
                user_id = assignment.user_id,
                task_id = assignment.task_id,
                "Task is already assigned to user"
            );
            return Err(TimeSyncError::InvalidInput(format!(
                "Task {} is already assigned to user {}",
                assignment.task_id, assignment.user_id
            )));
        }

        let created = self.assignments.add(assignment).await?;
        info!(
            assignment_id = created.assignment_id,
            user_id = created.user_id,
            task_id = created.task_id,
            "Assigned task to user"
        );
        Ok(created)
    }

    /// Tasks assigned to an existing user.
    pub async fn tasks_assigned_to_user(&self, user_id: i64) -> Result<Vec<TaskDetails>> {
        self.assignments.tasks_for_user(user_id).await
    }

    /// Users assigned to an existing task.
    pub async fn users_assigned_to_task(&self, task_id: i64) -> Result<Vec<User>> {
        self.assignments.users_for_task(task_id).await
    }
}

async fn require_user(users: &dyn UserRepository, user_id: i64) -> Result<User> {
    users.get_by_id(user_id).await?.ok_or_else(|| user_not_found(user_id))
}

pub(crate) fn user_not_found(user_id: i64) -> TimeSyncError {
    TimeSyncError::NotFound(format!("User with ID {user_id} not found"))
}

pub(crate) fn task_not_found(task_id: i64) -> TimeSyncError {
    TimeSyncError::NotFound(format!("Task with ID {task_id} not found"))
}
