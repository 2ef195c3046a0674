//! Canonical brand-appearance model.
//!
//! A [`BrandAppearance`] is a fully validated detection. A
//! [`SalvagedAppearance`] keeps a raw record that failed validation but still
//! names a brand and a timeline. Downstream code works on [`Detection`], which
//! wraps either and exposes the same accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

label_enum!(
    /// Kind of placement the vision service reported.
    PlacementType {
        Logo => "logo",
        JerseySponsor => "jersey_sponsor",
        StadiumSignage => "stadium_signage",
        DigitalOverlay => "digital_overlay",
        AudioMention => "audio_mention",
        ProductPlacement => "product_placement",
        Commercial => "commercial",
        CtvAd => "ctv_ad",
        OverlayAd => "overlay_ad",
        SqueezeAd => "squeeze_ad",
    }
);

label_enum!(
    /// Inserted advertising vs. sponsorship filmed as part of the event.
    SponsorshipCategory {
        AdPlacement => "ad_placement",
        InGamePlacement => "in_game_placement",
    }
);

label_enum!(
    Prominence {
        Primary => "primary",
        Secondary => "secondary",
        Background => "background",
    }
);

label_enum!(
    /// What was happening on screen when the brand appeared.
    PlacementContext {
        GameAction => "game_action",
        Replay => "replay",
        Celebration => "celebration",
        Interview => "interview",
        CrowdShot => "crowd_shot",
        Commercial => "commercial",
        Transition => "transition",
    }
);

label_enum!(
    SentimentContext {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
    }
);

label_enum!(
    ViewerAttention {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

/// One validated occurrence of a brand in a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAppearance {
    /// `[start, end]` in seconds; `end > start >= 0`.
    pub timeline: [f64; 2],
    pub brand: String,
    #[serde(rename = "type")]
    pub placement_type: PlacementType,
    pub sponsorship_category: SponsorshipCategory,
    /// `[x%, y%, width%, height%]` for visual placements.
    #[serde(default)]
    pub location: Option<[f64; 4]>,
    pub prominence: Prominence,
    pub context: PlacementContext,
    pub description: String,
    pub sentiment_context: SentimentContext,
    pub viewer_attention: ViewerAttention,
}

/// A raw record kept after failing validation.
///
/// `raw` holds every field of the original record except `brand`,
/// `timeline` and `fidelity_warning`, which are lifted into typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalvagedAppearance {
    pub brand: String,
    pub timeline: [f64; 2],
    /// Why the record could not be validated.
    pub fidelity_warning: String,
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

impl SalvagedAppearance {
    /// Builds a salvaged record from the raw object, lifting out the typed
    /// fields so they are not serialized twice.
    #[must_use]
    pub fn new(
        brand: String,
        timeline: [f64; 2],
        fidelity_warning: String,
        mut raw: Map<String, Value>,
    ) -> Self {
        raw.remove("brand");
        raw.remove("timeline");
        raw.remove("fidelity_warning");
        Self {
            brand,
            timeline,
            fidelity_warning,
            raw,
        }
    }

    fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

/// A detection as carried through aggregation and merging.
///
/// Deserialization tries `Salvaged` first: only salvaged records carry
/// `fidelity_warning`, and a salvaged record may otherwise fit the
/// validated shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detection {
    Salvaged(SalvagedAppearance),
    Validated(BrandAppearance),
}

impl Detection {
    #[must_use]
    pub fn brand(&self) -> &str {
        match self {
            Detection::Validated(a) => &a.brand,
            Detection::Salvaged(s) => &s.brand,
        }
    }

    #[must_use]
    pub fn timeline(&self) -> [f64; 2] {
        match self {
            Detection::Validated(a) => a.timeline,
            Detection::Salvaged(s) => s.timeline,
        }
    }

    /// Seconds on screen. Inverted spans on salvaged records count as zero.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        let [start, end] = self.timeline();
        (end - start).max(0.0)
    }

    #[must_use]
    pub fn is_salvaged(&self) -> bool {
        matches!(self, Detection::Salvaged(_))
    }

    /// Sponsorship category; salvaged records with an unreadable category
    /// default to in-game placement.
    #[must_use]
    pub fn category(&self) -> SponsorshipCategory {
        match self {
            Detection::Validated(a) => a.sponsorship_category,
            Detection::Salvaged(s) => s
                .raw_str("sponsorship_category")
                .and_then(SponsorshipCategory::from_label)
                .unwrap_or(SponsorshipCategory::InGamePlacement),
        }
    }

    /// Raw placement type label, if any.
    #[must_use]
    pub fn placement_type_label(&self) -> Option<&str> {
        match self {
            Detection::Validated(a) => Some(a.placement_type.as_str()),
            Detection::Salvaged(s) => s.raw_str("type"),
        }
    }

    /// Context label as reported. Salvaged records may carry labels outside
    /// [`PlacementContext`] (e.g. `goal`).
    #[must_use]
    pub fn context_label(&self) -> Option<&str> {
        match self {
            Detection::Validated(a) => Some(a.context.as_str()),
            Detection::Salvaged(s) => s.raw_str("context"),
        }
    }

    #[must_use]
    pub fn prominence(&self) -> Option<Prominence> {
        match self {
            Detection::Validated(a) => Some(a.prominence),
            Detection::Salvaged(s) => s.raw_str("prominence").and_then(Prominence::from_label),
        }
    }

    #[must_use]
    pub fn viewer_attention(&self) -> Option<ViewerAttention> {
        match self {
            Detection::Validated(a) => Some(a.viewer_attention),
            Detection::Salvaged(s) => s
                .raw_str("viewer_attention")
                .and_then(ViewerAttention::from_label),
        }
    }

    #[must_use]
    pub fn sentiment(&self) -> Option<SentimentContext> {
        match self {
            Detection::Validated(a) => Some(a.sentiment_context),
            Detection::Salvaged(s) => s
                .raw_str("sentiment_context")
                .and_then(SentimentContext::from_label),
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Detection::Validated(a) => &a.description,
            Detection::Salvaged(s) => s.raw_str("description").unwrap_or_default(),
        }
    }

    /// Returns a copy with both timeline endpoints shifted by `seconds`.
    #[must_use]
    pub fn offset_by(&self, seconds: f64) -> Detection {
        let mut shifted = self.clone();
        match &mut shifted {
            Detection::Validated(a) => {
                a.timeline = [a.timeline[0] + seconds, a.timeline[1] + seconds];
            }
            Detection::Salvaged(s) => {
                s.timeline = [s.timeline[0] + seconds, s.timeline[1] + seconds];
            }
        }
        shifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appearance() -> BrandAppearance {
        BrandAppearance {
            timeline: [10.0, 20.0],
            brand: "Nike".to_string(),
            placement_type: PlacementType::JerseySponsor,
            sponsorship_category: SponsorshipCategory::InGamePlacement,
            location: Some([10.0, 20.0, 5.0, 5.0]),
            prominence: Prominence::Primary,
            context: PlacementContext::Celebration,
            description: "Swoosh on the striker's jersey during the celebration".to_string(),
            sentiment_context: SentimentContext::Positive,
            viewer_attention: ViewerAttention::High,
        }
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        assert_eq!(PlacementType::CtvAd.as_str(), "ctv_ad");
        assert_eq!(
            PlacementType::from_label("jersey_sponsor"),
            Some(PlacementType::JerseySponsor)
        );
        assert_eq!(PlacementContext::from_label("goal"), None);
    }

    #[test]
    fn serde_uses_the_same_labels_as_as_str() {
        let json = serde_json::to_value(appearance()).expect("serialize");
        assert_eq!(json["type"], "jersey_sponsor");
        assert_eq!(json["sponsorship_category"], "in_game_placement");
        assert_eq!(json["context"], "celebration");
    }

    #[test]
    fn offset_by_returns_a_shifted_copy() {
        let original = Detection::Validated(appearance());
        let shifted = original.offset_by(600.0);
        assert_eq!(shifted.timeline(), [610.0, 620.0]);
        assert_eq!(original.timeline(), [10.0, 20.0]);
    }

    #[test]
    fn salvaged_lifts_typed_fields_out_of_raw() {
        let raw = serde_json::json!({
            "brand": "Acme",
            "timeline": [30.0, 25.0],
            "type": "blimp",
            "context": "goal",
            "sponsorship_category": "in_game_placement"
        });
        let Value::Object(map) = raw else {
            panic!("object literal");
        };
        let salvaged = SalvagedAppearance::new(
            "Acme".to_string(),
            [30.0, 25.0],
            "timeline: end must be after start".to_string(),
            map,
        );
        assert!(!salvaged.raw.contains_key("brand"));

        let detection = Detection::Salvaged(salvaged);
        assert!(detection.is_salvaged());
        assert_eq!(detection.exposure(), 0.0);
        assert_eq!(detection.context_label(), Some("goal"));
        assert_eq!(detection.prominence(), None);
        assert_eq!(detection.category(), SponsorshipCategory::InGamePlacement);

        let json = serde_json::to_value(&detection).expect("serialize");
        assert_eq!(json["brand"], "Acme");
        assert_eq!(json["type"], "blimp");
        assert!(json["fidelity_warning"].is_string());
    }

    #[test]
    fn validated_detection_deserializes_as_validated() {
        let json = serde_json::to_value(Detection::Validated(appearance())).expect("serialize");
        let back: Detection = serde_json::from_value(json).expect("deserialize");
        assert!(!back.is_salvaged());
    }

    #[test]
    fn salvaged_with_valid_labels_stays_salvaged_after_round_trip() {
        let mut record = serde_json::to_value(appearance()).expect("serialize");
        record["description"] = Value::String("short".to_string());
        let Value::Object(map) = record else {
            panic!("object");
        };
        let original = Detection::Salvaged(SalvagedAppearance::new(
            "Nike".to_string(),
            [10.0, 20.0],
            "description: must be at least 10 characters".to_string(),
            map,
        ));

        let text = serde_json::to_string(&original).expect("serialize");
        let back: Detection = serde_json::from_str(&text).expect("deserialize");

        assert!(back.is_salvaged());
        let Detection::Salvaged(salvaged) = &back else {
            panic!("expected salvaged");
        };
        assert_eq!(
            salvaged.fidelity_warning,
            "description: must be at least 10 characters"
        );
        assert_eq!(back, original);
    }
}
