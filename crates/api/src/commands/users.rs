//! User endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timesync_domain::{NewUser, TaskDetails, TimeEntryRecord, User};

use crate::context::AppContext;
use crate::error::ApiResult;

pub async fn list_users(State(context): State<Arc<AppContext>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(context.users.list_users().await?))
}

pub async fn create_user(
    State(context): State<Arc<AppContext>>,
    Json(user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let created = context.users.add_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_user(
    State(context): State<Arc<AppContext>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(context.users.get_user(user_id).await?))
}

/// Tasks assigned to the user.
pub async fn get_user_tasks(
    State(context): State<Arc<AppContext>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<TaskDetails>>> {
    Ok(Json(context.assignments.tasks_assigned_to_user(user_id).await?))
}

pub async fn get_user_time_entries(
    State(context): State<Arc<AppContext>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<TimeEntryRecord>>> {
    Ok(Json(context.time_entries.entries_for_user(user_id).await?))
}
