//! Deterministic placement-effectiveness metrics for one brand.

use serde::{Deserialize, Serialize};
use sponsorlens_core::{share_percent, Detection};

/// Description keywords marking an appearance as well timed.
const OPTIMAL_MOMENT_KEYWORDS: [&str; 5] = ["goal", "celebration", "replay", "highlight", "scoring"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowQuality {
    Optimal,
    Suboptimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementWindow {
    pub time_range: [f64; 2],
    pub duration: f64,
    #[serde(rename = "type")]
    pub placement_type: String,
    pub quality: WindowQuality,
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMetrics {
    pub average_duration: f64,
    pub total_screen_time: f64,
    pub screen_time_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementEffectiveness {
    pub optimal_placements: usize,
    pub suboptimal_placements: usize,
    /// Share of optimal placements, 0..=100.
    pub placement_score: f64,
    pub engagement_windows: Vec<EngagementWindow>,
    pub visibility_metrics: VisibilityMetrics,
}

#[must_use]
pub fn calculate_placement_effectiveness(
    detections: &[Detection],
    video_duration: f64,
) -> PlacementEffectiveness {
    let mut metrics = PlacementEffectiveness::default();

    for detection in detections {
        let description = detection.description().to_lowercase();
        let optimal = OPTIMAL_MOMENT_KEYWORDS
            .iter()
            .any(|k| description.contains(k));
        if optimal {
            metrics.optimal_placements += 1;
        } else {
            metrics.suboptimal_placements += 1;
        }

        metrics.engagement_windows.push(EngagementWindow {
            time_range: detection.timeline(),
            duration: detection.exposure(),
            placement_type: detection
                .placement_type_label()
                .unwrap_or("unknown")
                .to_string(),
            quality: if optimal {
                WindowQuality::Optimal
            } else {
                WindowQuality::Suboptimal
            },
            context: detection.context_label().unwrap_or("unknown").to_string(),
        });
    }

    let total = metrics.optimal_placements + metrics.suboptimal_placements;
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = metrics.optimal_placements as f64 / total as f64;
        metrics.placement_score = ratio * 100.0;
    }

    let total_screen_time: f64 = metrics.engagement_windows.iter().map(|w| w.duration).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_duration = if metrics.engagement_windows.is_empty() {
        0.0
    } else {
        total_screen_time / metrics.engagement_windows.len() as f64
    };
    metrics.visibility_metrics = VisibilityMetrics {
        average_duration,
        total_screen_time,
        screen_time_percentage: share_percent(total_screen_time, video_duration),
    };

    metrics
}
