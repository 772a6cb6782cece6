//! Provider sync endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use timesync_domain::constants::CLOCKIFY_PROVIDER;
use timesync_domain::{
    ConfigCheck, EntrySyncResult, PendingReview, SyncError, SyncReport, SyncStatus, SyncSummary,
    TimeEntryRecord,
};
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Body of `POST /api/sync/multiple`.
#[derive(Debug, Deserialize)]
pub struct MultiSyncRequest {
    #[serde(default)]
    pub provider_names: Option<Vec<String>>,
    #[serde(default)]
    pub entries: Option<Vec<TimeEntryRecord>>,
}

/// Query of `POST /api/sync/users/{user_id}/range`.
#[derive(Debug, Deserialize)]
pub struct UserRangeQuery {
    pub provider: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Query of `POST /api/sync/pending`.
#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    pub provider: Option<String>,
}

/// Query of `GET /api/sync/pending`.
#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    #[serde(default, alias = "autoSync")]
    pub auto_sync: bool,
}

/// `GET /api/sync/providers`
pub async fn list_providers(State(context): State<Arc<AppContext>>) -> Json<Vec<String>> {
    Json(context.orchestrator.get_available_providers())
}

/// `GET /api/sync/status`
pub async fn sync_status(State(context): State<Arc<AppContext>>) -> Json<SyncStatus> {
    Json(context.entry_sync.status())
}

/// `POST /api/sync/{provider}`
pub async fn sync_to_provider(
    State(context): State<Arc<AppContext>>,
    Path(provider): Path<String>,
    Json(entries): Json<Vec<TimeEntryRecord>>,
) -> ApiResult<Json<SyncReport>> {
    if entries.is_empty() {
        return Err(SyncError::InvalidArgument("time entries must not be empty".into()).into());
    }

    info!(provider = %provider, entries = entries.len(), "Sync requested");
    let report = context.orchestrator.sync_to_provider(&provider, Some(entries.as_slice())).await?;
    Ok(Json(report))
}

/// `POST /api/sync/multiple`
pub async fn sync_to_multiple(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<MultiSyncRequest>,
) -> ApiResult<Json<SyncSummary>> {
    if request.provider_names.as_ref().is_none_or(Vec::is_empty) {
        return Err(SyncError::InvalidArgument("provider names must not be empty".into()).into());
    }
    if request.entries.as_ref().is_none_or(Vec::is_empty) {
        return Err(SyncError::InvalidArgument("time entries must not be empty".into()).into());
    }

    let summary = context
        .orchestrator
        .sync_to_multiple_providers(request.provider_names.as_deref(), request.entries.as_deref())
        .await?;
    Ok(Json(summary))
}

/// `POST /api/sync/users/{user_id}/range`
pub async fn sync_user_range(
    State(context): State<Arc<AppContext>>,
    Path(user_id): Path<i64>,
    Query(query): Query<UserRangeQuery>,
) -> ApiResult<Json<EntrySyncResult>> {
    let provider = provider_or_default(&context, query.provider);
    let result = context
        .entry_sync
        .sync_user_entries_in_range(user_id, &provider, query.from, query.to)
        .await?;
    Ok(Json(result))
}

/// `POST /api/sync/pending`
pub async fn sync_pending(
    State(context): State<Arc<AppContext>>,
    Query(query): Query<ProviderQuery>,
) -> ApiResult<Json<EntrySyncResult>> {
    let provider = provider_or_default(&context, query.provider);
    let result = context.entry_sync.sync_pending(&provider, Utc::now()).await?;
    Ok(Json(result))
}

/// `GET /api/sync/pending`
pub async fn review_pending(
    State(context): State<Arc<AppContext>>,
    Query(query): Query<PendingQuery>,
) -> ApiResult<Json<PendingReview>> {
    let review = context.entry_sync.review_pending(Utc::now(), query.auto_sync).await?;
    Ok(Json(review))
}

/// `GET /api/sync/test-clockify-config`
pub async fn test_clockify_config(
    State(context): State<Arc<AppContext>>,
) -> ApiResult<Json<ConfigCheck>> {
    let check = context.entry_sync.check_provider_config(CLOCKIFY_PROVIDER, Utc::now()).await?;
    Ok(Json(check))
}

fn provider_or_default(context: &AppContext, provider: Option<String>) -> String {
    provider.unwrap_or_else(|| context.entry_sync.default_provider().to_string())
}
