//! Project and task endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timesync_domain::{
    NewAssignment, NewProject, NewTask, Project, ProjectDetails, Task, TaskAssignment, TaskDetails,
    User,
};

use crate::context::AppContext;
use crate::error::ApiResult;

pub async fn list_projects(
    State(context): State<Arc<AppContext>>,
) -> ApiResult<Json<Vec<ProjectDetails>>> {
    Ok(Json(context.projects.list_projects().await?))
}

pub async fn create_project(
    State(context): State<Arc<AppContext>>,
    Json(project): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let created = context.projects.add_project(project).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_project(
    State(context): State<Arc<AppContext>>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<ProjectDetails>> {
    Ok(Json(context.projects.get_project(project_id).await?))
}

pub async fn get_project_tasks(
    State(context): State<Arc<AppContext>>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Vec<TaskDetails>>> {
    Ok(Json(context.tasks.tasks_for_project(project_id).await?))
}

pub async fn create_task(
    State(context): State<Arc<AppContext>>,
    Json(task): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let created = context.tasks.add_task(task).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_task(
    State(context): State<Arc<AppContext>>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<TaskDetails>> {
    Ok(Json(context.tasks.get_task(task_id).await?))
}

/// Users assigned to the task.
pub async fn get_task_users(
    State(context): State<Arc<AppContext>>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(context.assignments.users_assigned_to_task(task_id).await?))
}

pub async fn create_assignment(
    State(context): State<Arc<AppContext>>,
    Json(assignment): Json<NewAssignment>,
) -> ApiResult<(StatusCode, Json<TaskAssignment>)> {
    let created = context.assignments.assign_task(assignment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
