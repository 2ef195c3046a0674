//! Stitches several single-video reports onto one continuous timeline.
//!
//! Videos are laid end to end in request order: every timestamp from the
//! n-th report is shifted by the summed durations of the reports before it.
//! Inputs are never mutated; every offset appearance is a new copy.

use std::collections::HashMap;

use chrono::Utc;
use sponsorlens_core::{
    AnalysisReport, BrandMetrics, CategoryBreakdown, CombinedReport, CombinedSummary, Detection,
    SentimentLabel, SponsorshipBreakdown, VideoWindow,
};

use crate::aggregator::round_to;
use crate::error::AnalysisError;

/// Merged sentiment is labelled with a tighter band than single videos.
const MERGED_SENTIMENT_THRESHOLD: f64 = 0.1;

/// Running totals for one brand across videos.
struct BrandAccumulator {
    brand: String,
    total_exposure_time: f64,
    total_appearances: usize,
    high_impact_moments: usize,
    estimated_social_mentions: u64,
    contexts: Vec<String>,
    appearances: Vec<Detection>,
    ad_placements: Vec<Detection>,
    in_game_placements: Vec<Detection>,
    ad_breakdown: CategoryBreakdown,
    in_game_breakdown: CategoryBreakdown,
    contextual_scores: Vec<f64>,
    sentiment_scores: Vec<f64>,
    prominence_scores: Vec<f64>,
    attention_scores: Vec<f64>,
}

impl BrandAccumulator {
    fn new(brand: &str) -> Self {
        Self {
            brand: brand.to_string(),
            total_exposure_time: 0.0,
            total_appearances: 0,
            high_impact_moments: 0,
            estimated_social_mentions: 0,
            contexts: Vec::new(),
            appearances: Vec::new(),
            ad_placements: Vec::new(),
            in_game_placements: Vec::new(),
            ad_breakdown: CategoryBreakdown::default(),
            in_game_breakdown: CategoryBreakdown::default(),
            contextual_scores: Vec::new(),
            sentiment_scores: Vec::new(),
            prominence_scores: Vec::new(),
            attention_scores: Vec::new(),
        }
    }

    fn absorb(&mut self, metrics: &BrandMetrics, offset: f64) {
        self.total_exposure_time += metrics.total_exposure_time;
        self.total_appearances += metrics.total_appearances;
        self.high_impact_moments += metrics.high_impact_moments;
        self.estimated_social_mentions += metrics.estimated_social_mentions;

        for context in &metrics.contexts {
            if !self.contexts.contains(context) {
                self.contexts.push(context.clone());
            }
        }

        self.appearances
            .extend(metrics.appearances.iter().map(|a| a.offset_by(offset)));
        self.ad_placements
            .extend(metrics.ad_placements.iter().map(|a| a.offset_by(offset)));
        self.in_game_placements
            .extend(metrics.in_game_placements.iter().map(|a| a.offset_by(offset)));

        let breakdown = &metrics.sponsorship_breakdown;
        self.ad_breakdown.count += breakdown.ad_placements.count;
        self.ad_breakdown.exposure_time += breakdown.ad_placements.exposure_time;
        self.in_game_breakdown.count += breakdown.in_game_placements.count;
        self.in_game_breakdown.exposure_time += breakdown.in_game_placements.exposure_time;

        self.contextual_scores.push(metrics.contextual_value_score);
        self.sentiment_scores.push(metrics.sentiment_score);
        self.prominence_scores.push(metrics.avg_prominence);
        self.attention_scores.push(metrics.avg_viewer_attention);
    }

    fn finish(self) -> BrandMetrics {
        let sentiment_score = mean(&self.sentiment_scores);
        let mut sponsorship_breakdown = SponsorshipBreakdown {
            ad_placements: self.ad_breakdown,
            in_game_placements: self.in_game_breakdown,
        };
        sponsorship_breakdown.recompute_percentages(self.total_exposure_time);
        sponsorship_breakdown.ad_placements.percentage_of_total =
            round_to(sponsorship_breakdown.ad_placements.percentage_of_total, 1);
        sponsorship_breakdown.in_game_placements.percentage_of_total =
            round_to(sponsorship_breakdown.in_game_placements.percentage_of_total, 1);

        BrandMetrics {
            brand: self.brand,
            total_exposure_time: round_to(self.total_exposure_time, 2),
            total_appearances: self.total_appearances,
            contextual_value_score: round_to(mean(&self.contextual_scores), 1),
            high_impact_moments: self.high_impact_moments,
            sentiment_score: round_to(sentiment_score, 2),
            sentiment_label: SentimentLabel::from_score(sentiment_score, MERGED_SENTIMENT_THRESHOLD),
            avg_prominence: round_to(mean(&self.prominence_scores), 2),
            avg_viewer_attention: round_to(mean(&self.attention_scores), 2),
            contexts: self.contexts,
            estimated_social_mentions: self.estimated_social_mentions,
            ai_insights: None,
            appearances: self.appearances,
            sponsorship_breakdown,
            ad_placements: self.ad_placements,
            in_game_placements: self.in_game_placements,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Display name for a source video on the combined timeline.
fn window_filename(video_id: &str) -> String {
    let short: String = video_id.chars().take(8).collect();
    format!("Video {short}")
}

/// Merges successful single-video reports, given in request order, into one
/// [`CombinedReport`].
///
/// `requested_ids` is the full list the client asked for, including videos
/// whose analysis failed; it only feeds `total_videos` and `video_ids`.
///
/// # Errors
///
/// Returns [`AnalysisError::Merge`] when `reports` is empty.
pub fn merge_analyses(
    reports: &[AnalysisReport],
    requested_ids: &[String],
) -> Result<CombinedReport, AnalysisError> {
    if reports.is_empty() {
        return Err(AnalysisError::Merge(
            "no successful analyses to combine".to_string(),
        ));
    }

    let mut cumulative_offset = 0.0;
    let mut combined_minutes = 0.0;
    let mut total_appearances = 0;
    let mut windows = Vec::with_capacity(reports.len());
    let mut raw_detections = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut brands: Vec<BrandAccumulator> = Vec::new();

    for report in reports {
        let duration = report.summary.video_duration_seconds;

        raw_detections.extend(
            report
                .raw_detections
                .iter()
                .map(|d| d.offset_by(cumulative_offset)),
        );

        for metrics in &report.brand_metrics {
            let slot = *index.entry(metrics.brand.clone()).or_insert_with(|| {
                brands.push(BrandAccumulator::new(&metrics.brand));
                brands.len() - 1
            });
            brands[slot].absorb(metrics, cumulative_offset);
        }

        windows.push(VideoWindow {
            video_id: report.video_id.clone(),
            filename: window_filename(&report.video_id),
            duration_minutes: report.summary.video_duration_minutes,
            start_time_seconds: cumulative_offset,
            end_time_seconds: cumulative_offset + duration,
        });

        combined_minutes += report.summary.video_duration_minutes;
        total_appearances += report.summary.total_appearances;
        cumulative_offset += duration;
    }

    let mut combined_brand_metrics: Vec<BrandMetrics> =
        brands.into_iter().map(BrandAccumulator::finish).collect();
    combined_brand_metrics
        .sort_by(|a, b| b.total_exposure_time.total_cmp(&a.total_exposure_time));

    let (top_performing_brand, top_brand_score) = combined_brand_metrics
        .first()
        .map_or((None, 0.0), |b| {
            (Some(b.brand.clone()), b.contextual_value_score)
        });

    tracing::info!(
        videos = reports.len(),
        requested = requested_ids.len(),
        brands = combined_brand_metrics.len(),
        "merged video analyses"
    );

    Ok(CombinedReport {
        combined_summary: CombinedSummary {
            total_videos: requested_ids.len(),
            combined_duration_minutes: round_to(combined_minutes, 1),
            total_brands: combined_brand_metrics.len(),
            total_appearances,
            top_performing_brand,
            top_brand_score,
            videos_analyzed: windows,
        },
        combined_brand_metrics,
        raw_detections,
        individual_analyses: reports.to_vec(),
        video_ids: requested_ids.to_vec(),
        analysis_timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[path = "merger_test.rs"]
mod tests;
