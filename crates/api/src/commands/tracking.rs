//! Time entry endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use timesync_domain::{NewTimeEntry, TimeEntryRecord};

use crate::context::AppContext;
use crate::error::ApiResult;

/// `from`/`to` query bounds, RFC 3339.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

pub async fn create_time_entry(
    State(context): State<Arc<AppContext>>,
    Json(entry): Json<NewTimeEntry>,
) -> ApiResult<(StatusCode, Json<TimeEntryRecord>)> {
    let created = context.time_entries.add_time_entry(entry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Entries fully inside `[from, to]`.
pub async fn list_time_entries(
    State(context): State<Arc<AppContext>>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<TimeEntryRecord>>> {
    Ok(Json(context.time_entries.entries_in_range(range.from, range.to).await?))
}
