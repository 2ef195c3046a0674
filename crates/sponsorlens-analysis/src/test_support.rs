//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{json, Map, Value};

use crate::gateway::{
    BoxFuture, BrandBackground, CollaboratorError, ContextualScore, DetectionService,
    IntelligenceGateway, ProgressSink, ProgressUpdate, RoiAssessment, RoiProjection,
    ScoringInsights, ScoringRequest, SummaryRequest, VideoMetadata,
};

pub(crate) fn raw_detection(brand: &str, timeline: [f64; 2], context: &str) -> Value {
    json!({
        "timeline": timeline,
        "brand": brand,
        "type": "stadium_signage",
        "sponsorship_category": "in_game_placement",
        "prominence": "secondary",
        "context": context,
        "description": format!("{brand} board visible during {context}"),
        "sentiment_context": "positive",
        "viewer_attention": "medium"
    })
}

pub(crate) struct FakeGateway {
    pub effectiveness: f64,
    pub roi_rating: Option<f64>,
    pub audience_reach: Option<f64>,
    pub failing_brands: Vec<String>,
    pub summary_fails: bool,
    pub score_calls: AtomicUsize,
    pub summary_calls: AtomicUsize,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            effectiveness: 80.0,
            roi_rating: Some(6.0),
            audience_reach: Some(5.0),
            failing_brands: Vec::new(),
            summary_fails: false,
            score_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeGateway {
    pub fn failing_for(brand: &str) -> Self {
        Self {
            failing_brands: vec![brand.to_string()],
            ..Self::default()
        }
    }

    pub fn insights(&self) -> ScoringInsights {
        ScoringInsights {
            placement_effectiveness_score: self.effectiveness,
            roi_assessment: RoiAssessment {
                audience_reach: self.audience_reach,
                ..RoiAssessment::default()
            },
            placement_analysis: None,
            recommendations: Some(json!({"immediate_actions": ["move boards closer to goal"]})),
            competitive_insights: None,
            roi_projection: RoiProjection {
                overall_roi_rating: self.roi_rating,
                ..RoiProjection::default()
            },
            executive_summary: Some("Solid placement.".to_string()),
        }
    }
}

impl IntelligenceGateway for FakeGateway {
    fn enrich_brand_background<'a>(&'a self, brand: &'a str) -> BoxFuture<'a, BrandBackground> {
        Box::pin(async move {
            BrandBackground {
                company_overview: format!("{brand} makes things"),
                ..BrandBackground::default()
            }
        })
    }

    fn score<'a>(
        &'a self,
        request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ContextualScore, CollaboratorError>> {
        Box::pin(async move {
            self.score_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_brands.contains(&request.brand) {
                return Err(CollaboratorError::new("openai", "model unavailable"));
            }
            Ok(ContextualScore::from_insights(self.insights()))
        })
    }

    fn executive_summary<'a>(
        &'a self,
        request: &'a SummaryRequest,
    ) -> BoxFuture<'a, Result<Map<String, Value>, CollaboratorError>> {
        Box::pin(async move {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            if self.summary_fails {
                return Err(CollaboratorError::new("openai", "summary unavailable"));
            }
            let mut map = Map::new();
            map.insert(
                "executive_summary".to_string(),
                json!(format!("{} brands reviewed", request.total_brands)),
            );
            Ok(map)
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeDetector {
    /// Detection output per video id.
    pub outputs: HashMap<String, Result<String, String>>,
    pub discovery: Option<String>,
    pub metadata: HashMap<String, VideoMetadata>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeDetector {
    pub fn with_output(video_id: &str, detections: &[Value]) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert(
            video_id.to_string(),
            Ok(format!(
                "Here is what I found:\n{}\n",
                Value::Array(detections.to_vec())
            )),
        );
        Self {
            outputs,
            ..Self::default()
        }
    }
}

impl DetectionService for FakeDetector {
    fn analyze<'a>(
        &'a self,
        video_id: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>> {
        Box::pin(async move {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            if prompt == crate::prompts::BRAND_DISCOVERY_PROMPT {
                return self
                    .discovery
                    .clone()
                    .ok_or_else(|| CollaboratorError::new("twelvelabs", "discovery failed"));
            }
            match self.outputs.get(video_id) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(e)) => Err(CollaboratorError::new("twelvelabs", e.clone())),
                None => Err(CollaboratorError::new("twelvelabs", "video not found")),
            }
        })
    }

    fn video_metadata<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<VideoMetadata, CollaboratorError>> {
        Box::pin(async move {
            self.metadata
                .get(video_id)
                .cloned()
                .ok_or_else(|| CollaboratorError::new("twelvelabs", "no metadata"))
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingProgress {
    pub fn progress_values(&self) -> Vec<u8> {
        self.updates
            .lock()
            .map(|u| u.iter().map(|p| p.progress).collect())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, update: ProgressUpdate) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Ok(mut updates) = self.updates.lock() {
                updates.push(update);
            }
        })
    }
}
