//! Per-brand metrics for one video.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sponsorlens_core::{
    BrandMetrics, CategoryBreakdown, Detection, SentimentLabel, SponsorshipBreakdown,
    SponsorshipCategory,
};

use crate::error::AnalysisError;
use crate::gateway::{
    AppearanceSummary, BrandBackground, IntelligenceGateway, ScoringInsights, ScoringRequest,
};
use crate::placement::{calculate_placement_effectiveness, PlacementEffectiveness};
use crate::weights::{is_high_impact, sentiment_value, WeightingPolicy};

const BASE_ENGAGEMENT: f64 = 1000.0;
const DEFAULT_ROI_RATING: f64 = 5.0;
const DEFAULT_AUDIENCE_REACH: f64 = 5.0;
const NEUTRAL_AVERAGE: f64 = 0.5;

/// Extra engagement credited per appearance in these contexts.
const CONTEXT_BONUSES: [(&str, f64); 6] = [
    ("celebration", 2000.0),
    ("game_action", 1500.0),
    ("replay", 1000.0),
    ("interview", 750.0),
    ("goal", 2500.0),
    ("scoring", 2000.0),
];

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViralPotential {
    High,
    Medium,
    Low,
}

impl ViralPotential {
    fn from_engagement_score(score: f64) -> Self {
        if score > 7.0 {
            ViralPotential::High
        } else if score > 4.0 {
            ViralPotential::Medium
        } else {
            ViralPotential::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementDetails {
    pub calculation_method: String,
    pub base_engagement: f64,
    pub ai_multiplier: f64,
    pub engagement_score: f64,
    pub estimated_impressions: f64,
    pub viral_potential: ViralPotential,
}

/// Everything attached to [`BrandMetrics::ai_insights`].
#[derive(Serialize)]
struct AiInsights<'a> {
    #[serde(flatten)]
    scoring: &'a ScoringInsights,
    placement_metrics: &'a PlacementEffectiveness,
    brand_intelligence: &'a BrandBackground,
    engagement_details: &'a EngagementDetails,
}

/// Estimates social mentions from the AI insights and the appearance
/// contexts. Deterministic given its inputs; the result is truncated.
#[must_use]
pub fn estimate_social_engagement(
    detections: &[Detection],
    insights: &ScoringInsights,
) -> (u64, EngagementDetails) {
    let effectiveness = insights.placement_effectiveness_score / 10.0;
    let roi_rating = insights
        .roi_projection
        .overall_roi_rating
        .unwrap_or(DEFAULT_ROI_RATING);
    let potential = insights
        .roi_assessment
        .audience_reach
        .unwrap_or(DEFAULT_AUDIENCE_REACH);

    let ai_multiplier = effectiveness / 10.0 + roi_rating / 10.0;
    let mut total = BASE_ENGAGEMENT * ai_multiplier * (potential / 10.0);
    for detection in detections {
        if let Some(context) = detection.context_label() {
            if let Some((_, bonus)) = CONTEXT_BONUSES.iter().find(|(c, _)| *c == context) {
                total += bonus;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mentions = total.max(0.0).trunc() as u64;
    let estimated_impressions = insights
        .roi_projection
        .estimated_impressions
        .unwrap_or_else(|| (total * 10.0).trunc());

    (
        mentions,
        EngagementDetails {
            calculation_method: "AI-enhanced".to_string(),
            base_engagement: BASE_ENGAGEMENT,
            ai_multiplier,
            engagement_score: potential,
            estimated_impressions,
            viral_potential: ViralPotential::from_engagement_score(potential),
        },
    )
}

/// Groups detections by exact brand name in first-seen order.
#[must_use]
pub fn group_by_brand(detections: &[Detection]) -> Vec<(String, Vec<Detection>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Detection>)> = Vec::new();
    for detection in detections {
        let slot = *index.entry(detection.brand()).or_insert_with(|| {
            groups.push((detection.brand().to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(detection.clone());
    }
    groups
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / f64::from(count))
}

fn appearance_summary(detection: &Detection) -> AppearanceSummary {
    AppearanceSummary {
        duration_seconds: detection.exposure(),
        placement_type: detection
            .placement_type_label()
            .unwrap_or("unknown")
            .to_string(),
        context: detection.context_label().unwrap_or("unknown").to_string(),
        prominence: detection
            .prominence()
            .map_or("unknown", |p| p.as_str())
            .to_string(),
        sentiment: detection
            .sentiment()
            .map_or("neutral", |s| s.as_str())
            .to_string(),
        attention: detection
            .viewer_attention()
            .map_or("medium", |a| a.as_str())
            .to_string(),
        description: detection.description().to_string(),
    }
}

fn breakdown_bucket(detections: &[Detection], total_exposure: f64) -> CategoryBreakdown {
    let exposure: f64 = detections.iter().map(Detection::exposure).sum();
    CategoryBreakdown {
        count: detections.len(),
        exposure_time: round_to(exposure, 2),
        percentage_of_total: round_to(
            sponsorlens_core::share_percent(exposure, total_exposure),
            1,
        ),
    }
}

/// Builds [`BrandMetrics`] for one brand's detections in one video.
///
/// Background research is best effort. AI scoring is mandatory: when the
/// gateway fails to score, the brand fails and no metrics are produced.
///
/// # Errors
///
/// Returns [`AnalysisError::Enrichment`] when scoring fails.
pub async fn aggregate_brand(
    brand: &str,
    detections: Vec<Detection>,
    video_duration: f64,
    policy: &WeightingPolicy,
    gateway: &dyn IntelligenceGateway,
) -> Result<BrandMetrics, AnalysisError> {
    let (ad_placements, in_game_placements): (Vec<Detection>, Vec<Detection>) = detections
        .iter()
        .cloned()
        .partition(|d| d.category() == SponsorshipCategory::AdPlacement);

    let total_exposure: f64 = detections.iter().map(Detection::exposure).sum();
    let high_impact_moments = detections.iter().filter(|d| is_high_impact(d)).count();

    let avg_prominence = mean(
        detections
            .iter()
            .map(|d| policy.prominence_weight(d.prominence())),
    )
    .unwrap_or(NEUTRAL_AVERAGE);
    let avg_attention = mean(
        detections
            .iter()
            .map(|d| policy.attention_weight(d.viewer_attention())),
    )
    .unwrap_or(NEUTRAL_AVERAGE);
    let sentiment_score = mean(detections.iter().map(|d| sentiment_value(d.sentiment())))
        .unwrap_or(0.0);

    let mut contexts: Vec<String> = Vec::new();
    for detection in &detections {
        let context = detection.context_label().unwrap_or("unknown");
        if !contexts.iter().any(|c| c == context) {
            contexts.push(context.to_string());
        }
    }

    tracing::debug!(brand, appearances = detections.len(), "gathering brand background");
    let background = gateway.enrich_brand_background(brand).await;
    let placement = calculate_placement_effectiveness(&detections, video_duration);

    let request = ScoringRequest {
        brand: brand.to_string(),
        video_duration,
        total_exposure,
        background,
        placement,
        appearances: detections.iter().map(appearance_summary).collect(),
    };
    let scored = gateway
        .score(&request)
        .await
        .map_err(|e| AnalysisError::Enrichment {
            brand: brand.to_string(),
            reason: e.to_string(),
        })?;

    let (estimated_social_mentions, engagement) =
        estimate_social_engagement(&detections, &scored.insights);

    let ai_insights = serde_json::to_value(AiInsights {
        scoring: &scored.insights,
        placement_metrics: &request.placement,
        brand_intelligence: &request.background,
        engagement_details: &engagement,
    })
    .ok();

    let sponsorship_breakdown = SponsorshipBreakdown {
        ad_placements: breakdown_bucket(&ad_placements, total_exposure),
        in_game_placements: breakdown_bucket(&in_game_placements, total_exposure),
    };

    tracing::info!(
        brand,
        appearances = detections.len(),
        exposure = total_exposure,
        score = scored.score,
        policy = policy.name,
        "brand metrics computed"
    );

    Ok(BrandMetrics {
        brand: brand.to_string(),
        total_exposure_time: round_to(total_exposure, 2),
        total_appearances: detections.len(),
        contextual_value_score: round_to(scored.score, 1),
        high_impact_moments,
        sentiment_score: round_to(sentiment_score, 2),
        sentiment_label: SentimentLabel::from_score(sentiment_score, policy.sentiment_threshold),
        avg_prominence: round_to(avg_prominence, 2),
        avg_viewer_attention: round_to(avg_attention, 2),
        contexts,
        estimated_social_mentions,
        ai_insights,
        appearances: detections,
        sponsorship_breakdown,
        ad_placements,
        in_game_placements,
    })
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
