use serde_json::json;
use sponsorlens_core::ClassificationRules;

use super::*;
use crate::test_support::{raw_detection, FakeGateway};
use crate::validator::normalize_detection;

fn detections(raw: &[serde_json::Value]) -> Vec<Detection> {
    raw.iter()
        .filter_map(|r| normalize_detection(r, &ClassificationRules::default()))
        .collect()
}

#[tokio::test]
async fn aggregates_exposure_and_breakdown() {
    let mut ad = raw_detection("Nike", [30.0, 35.0], "commercial");
    ad["type"] = json!("ctv_ad");
    ad["sponsorship_category"] = json!("ad_placement");
    let input = detections(&[
        raw_detection("Nike", [0.0, 10.0], "game_action"),
        raw_detection("Nike", [12.0, 17.0], "celebration"),
        ad,
    ]);

    let metrics = aggregate_brand(
        "Nike",
        input,
        600.0,
        &WeightingPolicy::PROGRESSIVE,
        &FakeGateway::default(),
    )
    .await
    .unwrap();

    assert_eq!(metrics.total_appearances, 3);
    assert!((metrics.total_exposure_time - 20.0).abs() < 1e-9);
    assert_eq!(metrics.sponsorship_breakdown.ad_placements.count, 1);
    assert_eq!(metrics.sponsorship_breakdown.in_game_placements.count, 2);
    assert!((metrics.sponsorship_breakdown.ad_placements.percentage_of_total - 25.0).abs() < 1e-9);
    assert!(
        (metrics.sponsorship_breakdown.in_game_placements.percentage_of_total - 75.0).abs() < 1e-9
    );
    assert_eq!(metrics.ad_placements.len(), 1);
    assert_eq!(metrics.in_game_placements.len(), 2);
    assert_eq!(
        metrics.contexts,
        vec!["game_action", "celebration", "commercial"]
    );
}

#[tokio::test]
async fn high_impact_counts_context_prominence_and_attention() {
    let mut primary = raw_detection("Ford", [0.0, 2.0], "crowd_shot");
    primary["prominence"] = json!("primary");
    let mut attentive = raw_detection("Ford", [3.0, 4.0], "transition");
    attentive["viewer_attention"] = json!("high");
    let input = detections(&[
        primary,
        attentive,
        raw_detection("Ford", [5.0, 6.0], "interview"),
        raw_detection("Ford", [7.0, 8.0], "game_action"),
    ]);

    let metrics = aggregate_brand(
        "Ford",
        input,
        100.0,
        &WeightingPolicy::PROGRESSIVE,
        &FakeGateway::default(),
    )
    .await
    .unwrap();
    assert_eq!(metrics.high_impact_moments, 3);
}

#[tokio::test]
async fn weighting_policy_changes_averages() {
    let input = detections(&[raw_detection("Ford", [0.0, 2.0], "game_action")]);
    let gateway = FakeGateway::default();

    let progressive = aggregate_brand(
        "Ford",
        input.clone(),
        100.0,
        &WeightingPolicy::PROGRESSIVE,
        &gateway,
    )
    .await
    .unwrap();
    let synchronous = aggregate_brand("Ford", input, 100.0, &WeightingPolicy::SYNCHRONOUS, &gateway)
        .await
        .unwrap();

    // Secondary prominence: 0.6 vs 0.5.
    assert!((progressive.avg_prominence - 0.6).abs() < 1e-9);
    assert!((synchronous.avg_prominence - 0.5).abs() < 1e-9);
    assert!((progressive.avg_viewer_attention - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn sentiment_is_averaged_and_labelled() {
    let mut negative = raw_detection("Pepsi", [0.0, 1.0], "replay");
    negative["sentiment_context"] = json!("negative");
    let mut neutral = raw_detection("Pepsi", [1.0, 2.0], "replay");
    neutral["sentiment_context"] = json!("neutral");
    let input = detections(&[
        raw_detection("Pepsi", [2.0, 3.0], "replay"),
        negative,
        neutral,
    ]);

    let metrics = aggregate_brand(
        "Pepsi",
        input,
        100.0,
        &WeightingPolicy::PROGRESSIVE,
        &FakeGateway::default(),
    )
    .await
    .unwrap();
    assert!(metrics.sentiment_score.abs() < 1e-9);
    assert_eq!(metrics.sentiment_label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn contextual_score_comes_from_gateway() {
    let gateway = FakeGateway {
        effectiveness: 72.0,
        ..FakeGateway::default()
    };
    let input = detections(&[raw_detection("Nike", [0.0, 2.0], "game_action")]);
    let metrics = aggregate_brand("Nike", input, 100.0, &WeightingPolicy::PROGRESSIVE, &gateway)
        .await
        .unwrap();
    assert!((metrics.contextual_value_score - 7.2).abs() < 1e-9);

    let insights = metrics.ai_insights.expect("insights attached");
    assert_eq!(insights["placement_effectiveness_score"], 72.0);
    assert!(insights["placement_metrics"]["engagement_windows"].is_array());
    assert_eq!(
        insights["brand_intelligence"]["company_overview"],
        "Nike makes things"
    );
    assert_eq!(
        insights["engagement_details"]["calculation_method"],
        "AI-enhanced"
    );
}

#[tokio::test]
async fn scoring_failure_fails_the_brand() {
    let gateway = FakeGateway::failing_for("Nike");
    let input = detections(&[raw_detection("Nike", [0.0, 2.0], "game_action")]);
    let err = aggregate_brand("Nike", input, 100.0, &WeightingPolicy::PROGRESSIVE, &gateway)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AnalysisError::Enrichment { ref brand, .. } if brand == "Nike"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn salvaged_inverted_span_counts_zero_exposure() {
    let input = detections(&[
        json!({"brand": "Nike", "timeline": [20, 10], "context": "goal"}),
        raw_detection("Nike", [0.0, 4.0], "game_action"),
    ]);
    assert!(input[0].is_salvaged());

    let metrics = aggregate_brand(
        "Nike",
        input,
        100.0,
        &WeightingPolicy::PROGRESSIVE,
        &FakeGateway::default(),
    )
    .await
    .unwrap();
    assert!((metrics.total_exposure_time - 4.0).abs() < 1e-9);
    assert_eq!(metrics.total_appearances, 2);
}

#[test]
fn social_engagement_formula() {
    let gateway = FakeGateway::default();
    let insights = gateway.insights();
    let input = detections(&[
        raw_detection("Nike", [0.0, 2.0], "celebration"),
        raw_detection("Nike", [3.0, 4.0], "crowd_shot"),
    ]);

    let (mentions, details) = estimate_social_engagement(&input, &insights);
    // eff 8.0, roi 6.0, reach 5.0: 1000 * (0.8 + 0.6) * 0.5 = 700, plus 2000.
    assert_eq!(mentions, 2700);
    assert!((details.ai_multiplier - 1.4).abs() < 1e-9);
    assert_eq!(details.viral_potential, ViralPotential::Medium);
    assert!((details.estimated_impressions - 27000.0).abs() < 1e-6);
}

#[test]
fn social_engagement_defaults_missing_ratings_to_five() {
    let gateway = FakeGateway {
        effectiveness: 50.0,
        roi_rating: None,
        audience_reach: None,
        ..FakeGateway::default()
    };
    let (mentions, details) = estimate_social_engagement(&[], &gateway.insights());
    // 1000 * (0.5 + 0.5) * 0.5
    assert_eq!(mentions, 500);
    assert!((details.engagement_score - 5.0).abs() < 1e-9);
}

#[test]
fn salvaged_goal_context_gets_bonus() {
    let input = detections(&[json!({"brand": "Nike", "timeline": [0, 5], "context": "goal"})]);
    let gateway = FakeGateway {
        effectiveness: 0.0,
        roi_rating: Some(0.0),
        ..FakeGateway::default()
    };
    let (mentions, _) = estimate_social_engagement(&input, &gateway.insights());
    assert_eq!(mentions, 2500);
}

#[test]
fn group_by_brand_keeps_first_seen_order() {
    let input = detections(&[
        raw_detection("Nike", [0.0, 1.0], "replay"),
        raw_detection("Ford", [1.0, 2.0], "replay"),
        raw_detection("Nike", [2.0, 3.0], "replay"),
    ]);
    let groups = group_by_brand(&input);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, "Nike");
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(groups[1].0, "Ford");
}
