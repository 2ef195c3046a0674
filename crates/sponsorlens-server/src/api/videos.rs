//! Read-only passthroughs to the video index.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_collaborator_error, ApiError, AppState};

const REPORT_FORMATS: [&str; 3] = ["pdf", "csv", "json"];

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub page: Option<u32>,
    pub page_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ReportTicket {
    message: String,
    status: &'static str,
    estimated_completion: DateTime<Utc>,
}

fn normalize_page_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(50).clamp(1, 50)
}

pub(super) async fn list_videos(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .catalog
        .list_videos(
            query.page.unwrap_or(1).max(1),
            normalize_page_limit(query.page_limit),
        )
        .await
        .map(Json)
        .map_err(|e| map_collaborator_error(req_id.0, &e))
}

pub(super) async fn video_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .catalog
        .video_details(&video_id)
        .await
        .map(Json)
        .map_err(|e| map_collaborator_error(req_id.0, &e))
}

pub(super) async fn video_thumbnail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .catalog
        .video_thumbnail(&video_id)
        .await
        .map(Json)
        .map_err(|e| map_collaborator_error(req_id.0, &e))
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let text = query.query.trim();
    if text.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "No search query provided",
        ));
    }
    state
        .catalog
        .search(text)
        .await
        .map(Json)
        .map_err(|e| map_collaborator_error(req_id.0, &e))
}

/// Acknowledges a report export request for a supported format.
pub(super) async fn report(
    Extension(req_id): Extension<RequestId>,
    Path(format): Path<String>,
) -> Result<Json<ReportTicket>, ApiError> {
    if !REPORT_FORMATS.contains(&format.as_str()) {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "Unsupported format",
        ));
    }
    Ok(Json(ReportTicket {
        message: format!("Report generation for {format} format initiated"),
        status: "processing",
        estimated_completion: Utc::now() + Duration::minutes(2),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_defaults_and_bounds() {
        assert_eq!(normalize_page_limit(None), 50);
        assert_eq!(normalize_page_limit(Some(0)), 1);
        assert_eq!(normalize_page_limit(Some(500)), 50);
        assert_eq!(normalize_page_limit(Some(10)), 10);
    }
}
