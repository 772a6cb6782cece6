//! Route table

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::commands::{export, health, projects, sync, tracking, users};
use crate::context::AppContext;

/// Build the application router.
pub fn build_router(context: Arc<AppContext>) -> Router {
    let sync_routes = Router::new()
        .route("/providers", get(sync::list_providers))
        .route("/status", get(sync::sync_status))
        .route("/multiple", post(sync::sync_to_multiple))
        .route("/pending", get(sync::review_pending).post(sync::sync_pending))
        .route("/test-clockify-config", get(sync::test_clockify_config))
        .route("/users/{user_id}/range", post(sync::sync_user_range))
        .route("/{provider}", post(sync::sync_to_provider));

    let api_routes = Router::new()
        .nest("/sync", sync_routes)
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/tasks", get(users::get_user_tasks))
        .route("/users/{user_id}/time-entries", get(users::get_user_time_entries))
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route("/projects/{project_id}", get(projects::get_project))
        .route("/projects/{project_id}/tasks", get(projects::get_project_tasks))
        .route("/tasks", post(projects::create_task))
        .route("/tasks/{task_id}", get(projects::get_task))
        .route("/tasks/{task_id}/users", get(projects::get_task_users))
        .route("/assignments", post(projects::create_assignment))
        .route(
            "/time-entries",
            get(tracking::list_time_entries).post(tracking::create_time_entry),
        )
        .route("/export/report", get(export::export_report))
        .route("/export/monthly", get(export::export_monthly));

    Router::new()
        .route("/health", get(health::get_health))
        .nest("/api", api_routes)
        .with_state(context)
}
