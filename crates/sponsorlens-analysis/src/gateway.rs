//! Contracts for the external services the pipeline depends on.
//!
//! The vision service, the language model and the video catalog are reached
//! only through these traits so the pipeline can be exercised with fakes.
//! Background research never fails (it degrades to an empty
//! [`BrandBackground`]); scoring and executive summaries do, and those
//! failures are fatal for the request that needed them.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::placement::PlacementEffectiveness;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service}: {message}")]
pub struct CollaboratorError {
    pub service: &'static str,
    pub message: String,
    /// The collaborator reported that the requested resource does not exist.
    pub not_found: bool,
}

impl CollaboratorError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
            not_found: false,
        }
    }

    pub fn not_found(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            not_found: true,
            ..Self::new(service, message)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Seconds, when the index knows it.
    pub duration: Option<f64>,
    pub filename: Option<String>,
}

/// Multimodal video analysis.
pub trait DetectionService: Send + Sync {
    /// Runs a free-text prompt against an indexed video and returns the raw
    /// model output.
    fn analyze<'a>(
        &'a self,
        video_id: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>>;

    fn video_metadata<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<VideoMetadata, CollaboratorError>>;
}

/// Read-only catalog access, passed through to HTTP clients unchanged.
pub trait VideoCatalog: Send + Sync {
    fn list_videos(&self, page: u32, page_limit: u32)
        -> BoxFuture<'_, Result<Value, CollaboratorError>>;

    fn video_details<'a>(&'a self, video_id: &'a str)
        -> BoxFuture<'a, Result<Value, CollaboratorError>>;

    fn video_thumbnail<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Value, CollaboratorError>>;

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Value, CollaboratorError>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSnippet {
    pub source: String,
    pub content: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    pub web_searches: usize,
    pub enhanced_with_ai: bool,
}

/// Background research on a brand. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandBackground {
    pub company_overview: String,
    pub industry: String,
    pub target_audience: String,
    pub brand_values: String,
    pub typical_sponsorships: String,
    pub competitors: Vec<String>,
    pub marketing_focus: String,
    pub web_search_results: Vec<WebSnippet>,
    pub data_sources: DataSources,
    /// Set when research degraded; the rest of the record is best effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BrandBackground {
    /// An empty record carrying the reason research failed.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// One appearance as presented to the scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSummary {
    pub duration_seconds: f64,
    #[serde(rename = "type")]
    pub placement_type: String,
    pub context: String,
    pub prominence: String,
    pub sentiment: String,
    pub attention: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub brand: String,
    pub video_duration: f64,
    pub total_exposure: f64,
    pub background: BrandBackground,
    pub placement: PlacementEffectiveness,
    pub appearances: Vec<AppearanceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiAssessment {
    pub value_rating: Option<String>,
    pub cost_efficiency: Option<f64>,
    pub exposure_quality: Option<f64>,
    /// 0..=10; drives the engagement multiplier.
    pub audience_reach: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiProjection {
    pub estimated_impressions: Option<f64>,
    pub cost_per_impression: Option<Value>,
    pub brand_recall_likelihood: Option<String>,
    pub purchase_intent_impact: Option<String>,
    /// 0..=10.
    pub overall_roi_rating: Option<f64>,
}

/// Structured output of the scoring model.
///
/// `placement_effectiveness_score` is required; a response without it is a
/// scoring failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringInsights {
    /// 0..=100.
    pub placement_effectiveness_score: f64,
    #[serde(default)]
    pub roi_assessment: RoiAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_insights: Option<Value>,
    #[serde(default)]
    pub roi_projection: RoiProjection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualScore {
    /// 0..=10.
    pub score: f64,
    pub insights: ScoringInsights,
}

impl ContextualScore {
    /// Rescales the 0..=100 placement effectiveness onto 0..=10.
    #[must_use]
    pub fn from_insights(insights: ScoringInsights) -> Self {
        let score = (insights.placement_effectiveness_score / 10.0).clamp(0.0, 10.0);
        Self { score, insights }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummaryItem {
    pub name: String,
    pub score: f64,
    pub exposure_seconds: f64,
    pub appearances: usize,
    pub sentiment: String,
    pub contexts: Vec<String>,
    pub ai_insights: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub video_title: String,
    pub duration_minutes: f64,
    pub total_brands: usize,
    pub brands: Vec<BrandSummaryItem>,
}

/// Language-model research, scoring and summarisation.
pub trait IntelligenceGateway: Send + Sync {
    /// Best-effort research; never fails.
    fn enrich_brand_background<'a>(&'a self, brand: &'a str) -> BoxFuture<'a, BrandBackground>;

    /// Mandatory AI scoring of one brand's placements.
    fn score<'a>(
        &'a self,
        request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ContextualScore, CollaboratorError>>;

    fn executive_summary<'a>(
        &'a self,
        request: &'a SummaryRequest,
    ) -> BoxFuture<'a, Result<Map<String, Value>, CollaboratorError>>;
}

/// A progress report from a running analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub stage: &'static str,
    pub progress: u8,
    pub message: String,
    pub details: Option<String>,
    pub brands_found: Option<Vec<String>>,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(stage: &'static str, progress: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress,
            message: message.into(),
            details: None,
            brands_found: None,
        }
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn brands_found(mut self, brands: Vec<String>) -> Self {
        self.brands_found = Some(brands);
        self
    }
}

/// Receives stage/progress reports from the pipeline.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: ProgressUpdate) -> BoxFuture<'_, ()>;
}

/// Discards progress reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: ProgressUpdate) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}
