//! CSV report downloads

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;

use super::tracking::RangeQuery;
use crate::context::AppContext;
use crate::error::ApiResult;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_response(body: String, filename: &str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
}

/// `GET /api/export/report?from&to`
pub async fn export_report(
    State(context): State<Arc<AppContext>>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let csv = context.exporter.export_range(range.from, range.to).await?;
    Ok(csv_response(csv, "time-report.csv"))
}

/// `GET /api/export/monthly`
pub async fn export_monthly(
    State(context): State<Arc<AppContext>>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let csv = context.exporter.export_month(now).await?;
    Ok(csv_response(csv, &format!("time-report-{}.csv", now.format("%Y-%m"))))
}
