//! Report shapes produced by aggregation and merging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::appearance::{Detection, SponsorshipCategory};

label_enum!(
    SentimentLabel {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
    }
);

impl SentimentLabel {
    /// Labels a mean sentiment score. Scores strictly beyond `±threshold`
    /// are positive/negative; everything in between is neutral.
    #[must_use]
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SentimentLabel::Positive
        } else if score < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Percentage of `part` in `total`, or 0 when `total` is not positive.
#[must_use]
pub fn share_percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub count: usize,
    pub exposure_time: f64,
    pub percentage_of_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipBreakdown {
    pub ad_placements: CategoryBreakdown,
    pub in_game_placements: CategoryBreakdown,
}

impl SponsorshipBreakdown {
    #[must_use]
    pub fn bucket(&self, category: SponsorshipCategory) -> &CategoryBreakdown {
        match category {
            SponsorshipCategory::AdPlacement => &self.ad_placements,
            SponsorshipCategory::InGamePlacement => &self.in_game_placements,
        }
    }

    /// Recomputes both percentages against `total_exposure`.
    pub fn recompute_percentages(&mut self, total_exposure: f64) {
        self.ad_placements.percentage_of_total =
            share_percent(self.ad_placements.exposure_time, total_exposure);
        self.in_game_placements.percentage_of_total =
            share_percent(self.in_game_placements.exposure_time, total_exposure);
    }
}

/// Aggregate statistics for one brand in one scope (a video or a merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMetrics {
    pub brand: String,
    pub total_exposure_time: f64,
    pub total_appearances: usize,
    /// 0..=10.
    pub contextual_value_score: f64,
    pub high_impact_moments: usize,
    /// -1..=1.
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub avg_prominence: f64,
    pub avg_viewer_attention: f64,
    /// Distinct context labels in first-seen order.
    pub contexts: Vec<String>,
    pub estimated_social_mentions: u64,
    #[serde(default)]
    pub ai_insights: Option<Value>,
    pub appearances: Vec<Detection>,
    pub sponsorship_breakdown: SponsorshipBreakdown,
    pub ad_placements: Vec<Detection>,
    pub in_game_placements: Vec<Detection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub event_title: String,
    pub analysis_date: String,
    pub video_duration_seconds: f64,
    pub video_duration_minutes: f64,
    pub total_brands_detected: usize,
    pub total_appearances: usize,
    pub brands_analyzed: Vec<String>,
    pub total_exposure_time_seconds: f64,
    pub exposure_coverage_percentage: f64,
    pub top_performing_brand: Option<String>,
    pub top_brand_score: f64,
    pub average_contextual_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_insights: Option<Value>,
}

/// Result of analysing a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub brand_metrics: Vec<BrandMetrics>,
    pub raw_detections: Vec<Detection>,
    pub video_id: String,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Position of one source video on the combined timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoWindow {
    pub video_id: String,
    pub filename: String,
    pub duration_minutes: f64,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSummary {
    /// Number of videos requested, including any that failed.
    pub total_videos: usize,
    pub combined_duration_minutes: f64,
    pub total_brands: usize,
    pub total_appearances: usize,
    pub top_performing_brand: Option<String>,
    pub top_brand_score: f64,
    pub videos_analyzed: Vec<VideoWindow>,
}

/// Result of merging several single-video reports onto one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedReport {
    pub combined_summary: CombinedSummary,
    pub combined_brand_metrics: Vec<BrandMetrics>,
    pub raw_detections: Vec<Detection>,
    pub individual_analyses: Vec<AnalysisReport>,
    pub video_ids: Vec<String>,
    pub analysis_timestamp: DateTime<Utc>,
}
