//! Single-video pipeline: detection, validation, classification and
//! aggregation, with stage reporting.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde_json::{json, Map, Value};
use sponsorlens_core::{AnalysisReport, AnalysisSummary, BrandMetrics, ClassificationRules, Detection};

use crate::aggregator::{aggregate_brand, group_by_brand, round_to};
use crate::classifier::is_valid_brand;
use crate::error::AnalysisError;
use crate::extract::{extract_json_array, parse_brand_list};
use crate::gateway::{
    BrandSummaryItem, DetectionService, IntelligenceGateway, ProgressSink, ProgressUpdate,
    SummaryRequest,
};
use crate::prompts::{brand_analysis_prompt, BRAND_DISCOVERY_PROMPT};
use crate::validator::normalize_detection;
use crate::weights::WeightingPolicy;

/// Which request path is running the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Background job with progress reporting; analyses the requested
    /// brands only.
    Progressive,
    /// Request/response path; discovers extra brands, ranks them and adds
    /// an executive summary.
    Synchronous,
}

impl AnalysisMode {
    #[must_use]
    pub fn policy(self) -> &'static WeightingPolicy {
        match self {
            AnalysisMode::Progressive => &WeightingPolicy::PROGRESSIVE,
            AnalysisMode::Synchronous => &WeightingPolicy::SYNCHRONOUS,
        }
    }

    /// Duration assumed when the index has no metadata for the video.
    #[must_use]
    pub fn default_duration(self) -> f64 {
        match self {
            AnalysisMode::Progressive => 300.0,
            AnalysisMode::Synchronous => 5400.0,
        }
    }
}

fn short_id(video_id: &str) -> String {
    video_id.chars().take(8).collect()
}

fn brand_preview(brands: &[String]) -> String {
    let shown = brands.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
    if brands.len() > 5 {
        format!("{shown}...")
    } else {
        shown
    }
}

/// Summary returned when a video has no brand appearances at all.
fn empty_executive_insights() -> Value {
    json!({
        "key_findings": ["No brand appearances detected in the video."],
        "strategic_recommendations": ["Review video content and brand detection parameters."],
        "market_positioning": "Unable to assess without brand data."
    })
}

/// Runs the detection → aggregation pipeline for one video at a time.
#[derive(Clone)]
pub struct AnalysisPipeline {
    detector: Arc<dyn DetectionService>,
    gateway: Arc<dyn IntelligenceGateway>,
    rules: Arc<ClassificationRules>,
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(
        detector: Arc<dyn DetectionService>,
        gateway: Arc<dyn IntelligenceGateway>,
        rules: Arc<ClassificationRules>,
    ) -> Self {
        Self {
            detector,
            gateway,
            rules,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }

    /// Extracts and normalizes detections from raw vision-service output.
    ///
    /// Output without a parseable JSON array yields no detections.
    #[must_use]
    pub fn parse_detections(&self, text: &str) -> Vec<Detection> {
        let Some(records) = extract_json_array(text) else {
            tracing::warn!(len = text.len(), "no JSON array in detection output");
            return Vec::new();
        };
        records
            .iter()
            .filter_map(|raw| normalize_detection(raw, &self.rules))
            .collect()
    }

    /// Asks the vision service for every commercial brand in the video and
    /// unions the valid ones with `requested`. Discovery is best effort.
    async fn discover_brands(&self, video_id: &str, requested: &[String]) -> Vec<String> {
        let mut brands = requested.to_vec();
        match self.detector.analyze(video_id, BRAND_DISCOVERY_PROMPT).await {
            Ok(text) => {
                for name in parse_brand_list(&text) {
                    if is_valid_brand(&name, &self.rules) && !brands.contains(&name) {
                        brands.push(name);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "brand discovery failed, using requested brands");
            }
        }
        brands
    }

    /// Analyzes one video.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Detection`] when the vision service call fails.
    /// - [`AnalysisError::Enrichment`] when any brand fails AI scoring.
    /// - [`AnalysisError::Summary`] when the synchronous executive summary
    ///   fails.
    pub async fn analyze_video(
        &self,
        video_id: &str,
        requested_brands: &[String],
        mode: AnalysisMode,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisReport, AnalysisError> {
        tracing::info!(video_id, ?mode, brands = requested_brands.len(), "starting video analysis");
        progress
            .report(
                ProgressUpdate::new("initialization", 0, "Starting video analysis...")
                    .details("Connecting to the video index"),
            )
            .await;

        let brands = match mode {
            AnalysisMode::Progressive => requested_brands.to_vec(),
            AnalysisMode::Synchronous => self.discover_brands(video_id, requested_brands).await,
        };

        progress
            .report(
                ProgressUpdate::new(
                    "brand_detection",
                    25,
                    format!("Focusing on {} selected brands", brands.len()),
                )
                .details(brand_preview(&brands))
                .brands_found(brands.clone()),
            )
            .await;
        progress
            .report(
                ProgressUpdate::new("brand_analysis", 30, "Analyzing brand appearances...")
                    .details("Scanning for logos, mentions, and placements"),
            )
            .await;

        let prompt = brand_analysis_prompt(&brands);
        progress
            .report(
                ProgressUpdate::new("brand_analysis", 35, "Analyzing video with multimodal AI...")
                    .details("Detecting brands, logos, and sponsorship content"),
            )
            .await;
        let output = self
            .detector
            .analyze(video_id, &prompt)
            .await
            .map_err(|e| AnalysisError::Detection {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            })?;

        progress
            .report(
                ProgressUpdate::new("brand_analysis", 50, "Processing AI response...")
                    .details("Extracting brand detection data"),
            )
            .await;
        let detections = self.parse_detections(&output);

        progress
            .report(
                ProgressUpdate::new("processing", 60, "Processing brand appearances...")
                    .details(format!("Analyzing {} detections", detections.len())),
            )
            .await;

        let (video_duration, filename) = match self.detector.video_metadata(video_id).await {
            Ok(meta) => (
                meta.duration.unwrap_or_else(|| mode.default_duration()),
                meta.filename,
            ),
            Err(e) => {
                tracing::warn!(video_id, error = %e, "video metadata unavailable, using defaults");
                (mode.default_duration(), None)
            }
        };
        let video_title = filename.unwrap_or_else(|| format!("Video {}", short_id(video_id)));

        progress
            .report(
                ProgressUpdate::new("metrics", 75, "Calculating brand metrics...")
                    .details("Computing exposure scores and insights"),
            )
            .await;

        let policy = mode.policy();
        let gateway = self.gateway.as_ref();
        let mut brand_metrics = try_join_all(group_by_brand(&detections).into_iter().map(
            |(brand, group)| async move {
                aggregate_brand(&brand, group, video_duration, policy, gateway).await
            },
        ))
        .await?;

        if mode == AnalysisMode::Synchronous {
            brand_metrics
                .sort_by(|a, b| b.contextual_value_score.total_cmp(&a.contextual_value_score));
        }

        progress
            .report(
                ProgressUpdate::new("finalizing", 90, "Generating insights...")
                    .details("Creating executive summary"),
            )
            .await;

        let executive_insights = match mode {
            AnalysisMode::Progressive => None,
            AnalysisMode::Synchronous => Some(
                self.executive_insights(&brand_metrics, video_duration, &video_title)
                    .await?,
            ),
        };

        let event_title = match mode {
            AnalysisMode::Progressive => "Brand Sponsorship Analysis".to_string(),
            AnalysisMode::Synchronous => format!("Brand Sponsorship Analysis - {video_title}"),
        };
        let summary = summarize(
            event_title,
            video_duration,
            &brands,
            &brand_metrics,
            executive_insights,
        );

        tracing::info!(
            video_id,
            brands = summary.total_brands_detected,
            appearances = summary.total_appearances,
            "video analysis finished"
        );

        Ok(AnalysisReport {
            summary,
            brand_metrics,
            raw_detections: detections,
            video_id: video_id.to_string(),
            analysis_timestamp: Utc::now(),
        })
    }

    async fn executive_insights(
        &self,
        brand_metrics: &[BrandMetrics],
        video_duration: f64,
        video_title: &str,
    ) -> Result<Value, AnalysisError> {
        if brand_metrics.is_empty() {
            return Ok(empty_executive_insights());
        }

        let request = SummaryRequest {
            video_title: video_title.to_string(),
            duration_minutes: round_to(video_duration / 60.0, 1),
            total_brands: brand_metrics.len(),
            brands: brand_metrics
                .iter()
                .map(|m| BrandSummaryItem {
                    name: m.brand.clone(),
                    score: m.contextual_value_score,
                    exposure_seconds: m.total_exposure_time,
                    appearances: m.total_appearances,
                    sentiment: m.sentiment_label.as_str().to_string(),
                    contexts: m.contexts.clone(),
                    ai_insights: m.ai_insights.clone(),
                })
                .collect(),
        };
        let insights: Map<String, Value> = self
            .gateway
            .executive_summary(&request)
            .await
            .map_err(|e| AnalysisError::Summary(e.to_string()))?;
        Ok(Value::Object(insights))
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(
    event_title: String,
    video_duration: f64,
    brands: &[String],
    brand_metrics: &[BrandMetrics],
    executive_insights: Option<Value>,
) -> AnalysisSummary {
    let total_exposure: f64 = brand_metrics.iter().map(|m| m.total_exposure_time).sum();
    let total_appearances = brand_metrics.iter().map(|m| m.total_appearances).sum();
    let average_contextual_score = if brand_metrics.is_empty() {
        0.0
    } else {
        brand_metrics
            .iter()
            .map(|m| m.contextual_value_score)
            .sum::<f64>()
            / brand_metrics.len() as f64
    };
    let top = brand_metrics
        .iter()
        .reduce(|best, m| {
            if m.contextual_value_score > best.contextual_value_score {
                m
            } else {
                best
            }
        });

    AnalysisSummary {
        event_title,
        analysis_date: Utc::now().to_rfc3339(),
        video_duration_seconds: video_duration,
        video_duration_minutes: round_to(video_duration / 60.0, 1),
        total_brands_detected: brand_metrics.len(),
        total_appearances,
        brands_analyzed: brands.to_vec(),
        total_exposure_time_seconds: round_to(total_exposure, 1),
        exposure_coverage_percentage: round_to(
            sponsorlens_core::share_percent(total_exposure, video_duration),
            2,
        ),
        top_performing_brand: top.map(|m| m.brand.clone()),
        top_brand_score: top.map_or(0.0, |m| m.contextual_value_score),
        average_contextual_score: round_to(average_contextual_score, 1),
        executive_insights,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
