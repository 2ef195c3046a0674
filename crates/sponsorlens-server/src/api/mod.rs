mod analyze;
mod videos;

use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sponsorlens_analysis::{AnalysisError, CollaboratorError, VideoCatalog};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};
use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub catalog: Arc<dyn VideoCatalog>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    tracing::error!(error = %error, "analysis request failed");
    ApiError::new(request_id, "internal_error", error.to_string())
}

pub(super) fn map_collaborator_error(request_id: String, error: &CollaboratorError) -> ApiError {
    if error.not_found {
        tracing::debug!(error = %error, "collaborator reported not found");
        return ApiError::new(request_id, "not_found", error.message.clone());
    }
    tracing::error!(error = %error, "collaborator call failed");
    ApiError::new(request_id, "internal_error", error.to_string())
}

/// Parses an optional JSON body; an empty body yields `T::default()`.
pub(super) fn parse_optional_body<T>(request_id: &str, body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("invalid JSON body: {e}"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/analyze/{video_id}/start",
            post(analyze::start_analysis),
        )
        .route("/api/analyze/status/{job_id}", get(analyze::get_status))
        .route("/api/analyze/multi/start", post(analyze::start_multi))
        .route(
            "/api/analyze/{video_id}",
            get(analyze::analyze_now).post(analyze::analyze_now),
        )
        .route("/api/videos", get(videos::list_videos))
        .route(
            "/api/video/{video_id}/details",
            get(videos::video_details),
        )
        .route(
            "/api/video/{video_id}/thumbnail",
            get(videos::video_thumbnail),
        )
        .route("/api/search", get(videos::search))
        .route("/api/report/{format}", get(videos::report))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
