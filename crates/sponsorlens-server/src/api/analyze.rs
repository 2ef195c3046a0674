use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sponsorlens_analysis::{AnalysisMode, NoProgress};
use sponsorlens_core::AnalysisReport;
use uuid::Uuid;

use crate::jobs::Job;
use crate::middleware::RequestId;

use super::{map_analysis_error, parse_optional_body, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct BrandSelection {
    brands: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MultiStartRequest {
    video_ids: Vec<String>,
    brands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StartResponse {
    job_id: String,
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_ids: Option<Vec<String>>,
    selected_brands: Vec<String>,
}

fn multi_job_id(video_ids: &[String]) -> String {
    let head = video_ids
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("-");
    format!("multi-{head}-{}", Uuid::new_v4())
}

fn single_job_id(video_id: &str) -> String {
    format!("{video_id}-{}", Uuid::new_v4())
}

pub(super) async fn start_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
    body: Bytes,
) -> Result<Json<StartResponse>, ApiError> {
    let selection: BrandSelection = parse_optional_body(&req_id.0, &body)?;
    let job_id = single_job_id(&video_id);

    state.orchestrator.tracker().create(&job_id).await;
    state
        .orchestrator
        .spawn_single(job_id.clone(), video_id.clone(), selection.brands.clone());
    tracing::info!(%job_id, %video_id, brands = ?selection.brands, "analysis job started");

    Ok(Json(StartResponse {
        job_id,
        status: "started",
        message: "Analysis started successfully",
        video_ids: None,
        selected_brands: selection.brands,
    }))
}

pub(super) async fn get_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state
        .orchestrator
        .tracker()
        .get(&job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::new(req_id.0, "not_found", "Job not found"))
}

pub(super) async fn start_multi(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<StartResponse>, ApiError> {
    let request: MultiStartRequest = parse_optional_body(&req_id.0, &body)?;
    if request.video_ids.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "No video IDs provided",
        ));
    }

    let job_id = multi_job_id(&request.video_ids);
    state.orchestrator.tracker().create(&job_id).await;
    state.orchestrator.spawn_multi(
        job_id.clone(),
        request.video_ids.clone(),
        request.brands.clone(),
    );
    tracing::info!(%job_id, videos = request.video_ids.len(), "multi-video job started");

    Ok(Json(StartResponse {
        job_id,
        status: "started",
        message: "Multi-video analysis started successfully",
        video_ids: Some(request.video_ids),
        selected_brands: request.brands,
    }))
}

/// Runs the full pipeline inside the request, with brand discovery and an
/// executive summary.
pub(super) async fn analyze_now(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
    body: Bytes,
) -> Result<Json<AnalysisReport>, ApiError> {
    let selection: BrandSelection = parse_optional_body(&req_id.0, &body)?;
    state
        .orchestrator
        .pipeline()
        .analyze_video(
            &video_id,
            &selection.brands,
            AnalysisMode::Synchronous,
            &NoProgress,
        )
        .await
        .map(Json)
        .map_err(|e| map_analysis_error(req_id.0, &e))
}
