//! Fake collaborators for router and orchestrator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use sponsorlens_analysis::prompts::BRAND_DISCOVERY_PROMPT;
use sponsorlens_analysis::{
    AnalysisPipeline, BoxFuture, BrandBackground, CollaboratorError, ContextualScore,
    DetectionService, IntelligenceGateway, ScoringInsights, ScoringRequest, SummaryRequest,
    VideoCatalog, VideoMetadata,
};
use sponsorlens_core::ClassificationRules;

pub(crate) fn sighting(brand: &str, start: f64, end: f64) -> Value {
    json!({
        "timeline": [start, end],
        "brand": brand,
        "type": "jersey_sponsor",
        "sponsorship_category": "in_game_placement",
        "prominence": "primary",
        "context": "game_action",
        "description": format!("{brand} logo on the home jersey"),
        "sentiment_context": "positive",
        "viewer_attention": "high"
    })
}

enum Scripted {
    Detections(Vec<Value>),
    Fails(&'static str),
    Stalls,
}

/// Vision service with a scripted answer per video.
#[derive(Default)]
pub(crate) struct ScriptedDetector {
    videos: HashMap<String, (Scripted, f64)>,
    delays: HashMap<String, Duration>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ScriptedDetector {
    pub fn video(mut self, video_id: &str, duration: f64, detections: Vec<Value>) -> Self {
        self.videos.insert(
            video_id.to_string(),
            (Scripted::Detections(detections), duration),
        );
        self
    }

    pub fn failing(mut self, video_id: &str) -> Self {
        self.videos.insert(
            video_id.to_string(),
            (Scripted::Fails("index unavailable"), 0.0),
        );
        self
    }

    /// Holds the detection call for `video_id` open for `delay`.
    pub fn delayed(mut self, video_id: &str, delay: Duration) -> Self {
        self.delays.insert(video_id.to_string(), delay);
        self
    }

    /// Highest number of detection calls observed running at once.
    pub fn peak_in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }

    pub fn stalling(mut self, video_id: &str) -> Self {
        self.videos
            .insert(video_id.to_string(), (Scripted::Stalls, 0.0));
        self
    }
}

impl DetectionService for ScriptedDetector {
    fn analyze<'a>(
        &'a self,
        video_id: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>> {
        Box::pin(async move {
            if prompt == BRAND_DISCOVERY_PROMPT {
                return Ok(String::new());
            }
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(video_id) {
                tokio::time::sleep(*delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.videos.get(video_id) {
                Some((Scripted::Detections(found), _)) => {
                    Ok(format!("```json\n{}\n```", Value::Array(found.clone())))
                }
                Some((Scripted::Fails(reason), _)) => {
                    Err(CollaboratorError::new("twelvelabs", *reason))
                }
                Some((Scripted::Stalls, _)) => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("[]".to_string())
                }
                None => Err(CollaboratorError::not_found("twelvelabs", "video not found")),
            }
        })
    }

    fn video_metadata<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<VideoMetadata, CollaboratorError>> {
        Box::pin(async move {
            match self.videos.get(video_id) {
                Some((_, duration)) => Ok(VideoMetadata {
                    duration: Some(*duration),
                    filename: Some(format!("{video_id}.mp4")),
                }),
                None => Err(CollaboratorError::not_found("twelvelabs", "video not found")),
            }
        })
    }
}

pub(crate) struct FixedGateway;

impl IntelligenceGateway for FixedGateway {
    fn enrich_brand_background<'a>(&'a self, _brand: &'a str) -> BoxFuture<'a, BrandBackground> {
        Box::pin(async { BrandBackground::default() })
    }

    fn score<'a>(
        &'a self,
        _request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ContextualScore, CollaboratorError>> {
        Box::pin(async {
            let insights: ScoringInsights =
                serde_json::from_value(json!({"placement_effectiveness_score": 70.0}))
                    .map_err(|e| CollaboratorError::new("openai", e.to_string()))?;
            Ok(ContextualScore::from_insights(insights))
        })
    }

    fn executive_summary<'a>(
        &'a self,
        _request: &'a SummaryRequest,
    ) -> BoxFuture<'a, Result<Map<String, Value>, CollaboratorError>> {
        Box::pin(async {
            let mut map = Map::new();
            map.insert("executive_summary".to_string(), json!("Strong showing."));
            Ok(map)
        })
    }
}

/// Catalog that knows a single video, `vid-1`.
pub(crate) struct OneVideoCatalog;

impl VideoCatalog for OneVideoCatalog {
    fn list_videos(
        &self,
        page: u32,
        page_limit: u32,
    ) -> BoxFuture<'_, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            Ok(json!({
                "videos": [{"id": "vid-1", "filename": "final.mp4"}],
                "total_count": 1,
                "page": page,
                "page_limit": page_limit,
            }))
        })
    }

    fn video_details<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            if video_id == "vid-1" {
                Ok(json!({"id": "vid-1", "filename": "final.mp4", "duration": 600.0}))
            } else {
                Err(CollaboratorError::not_found("twelvelabs", "no such video"))
            }
        })
    }

    fn video_thumbnail<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            if video_id == "vid-1" {
                Ok(json!({"thumbnail_url": "https://cdn.example.com/vid-1.jpg"}))
            } else {
                Err(CollaboratorError::new("twelvelabs", "index unavailable"))
            }
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move { Ok(json!({"query": query, "results": [], "total_results": 0})) })
    }
}

pub(crate) fn pipeline(detector: ScriptedDetector) -> AnalysisPipeline {
    AnalysisPipeline::new(
        Arc::new(detector),
        Arc::new(FixedGateway),
        Arc::new(ClassificationRules::default()),
    )
}
