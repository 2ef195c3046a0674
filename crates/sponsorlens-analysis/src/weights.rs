//! Numeric weights for categorical appearance attributes.
//!
//! The asynchronous job path and the synchronous endpoint historically used
//! different prominence/attention tables. Both are kept as named policies.

use sponsorlens_core::{Detection, Prominence, SentimentContext, ViewerAttention};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingPolicy {
    pub name: &'static str,
    pub primary: f64,
    pub secondary: f64,
    pub background: f64,
    pub unknown_prominence: f64,
    pub high_attention: f64,
    pub medium_attention: f64,
    pub low_attention: f64,
    pub unknown_attention: f64,
    /// Mean sentiment beyond `±sentiment_threshold` is labelled positive/negative.
    pub sentiment_threshold: f64,
}

impl WeightingPolicy {
    /// Used by background analysis jobs.
    pub const PROGRESSIVE: Self = Self {
        name: "progressive",
        primary: 1.0,
        secondary: 0.6,
        background: 0.3,
        unknown_prominence: 0.3,
        high_attention: 1.0,
        medium_attention: 0.6,
        low_attention: 0.3,
        unknown_attention: 0.3,
        sentiment_threshold: 0.3,
    };

    /// Used by the synchronous analysis endpoint.
    pub const SYNCHRONOUS: Self = Self {
        name: "synchronous",
        primary: 1.0,
        secondary: 0.5,
        background: 0.2,
        unknown_prominence: 0.5,
        high_attention: 1.0,
        medium_attention: 0.6,
        low_attention: 0.3,
        unknown_attention: 0.6,
        sentiment_threshold: 0.3,
    };

    #[must_use]
    pub fn prominence_weight(&self, prominence: Option<Prominence>) -> f64 {
        match prominence {
            Some(Prominence::Primary) => self.primary,
            Some(Prominence::Secondary) => self.secondary,
            Some(Prominence::Background) => self.background,
            None => self.unknown_prominence,
        }
    }

    #[must_use]
    pub fn attention_weight(&self, attention: Option<ViewerAttention>) -> f64 {
        match attention {
            Some(ViewerAttention::High) => self.high_attention,
            Some(ViewerAttention::Medium) => self.medium_attention,
            Some(ViewerAttention::Low) => self.low_attention,
            None => self.unknown_attention,
        }
    }
}

/// Positive 1, neutral or unknown 0, negative -1.
#[must_use]
pub fn sentiment_value(sentiment: Option<SentimentContext>) -> f64 {
    match sentiment {
        Some(SentimentContext::Positive) => 1.0,
        Some(SentimentContext::Negative) => -1.0,
        Some(SentimentContext::Neutral) | None => 0.0,
    }
}

const HIGH_IMPACT_CONTEXTS: [&str; 3] = ["celebration", "interview", "commercial"];

/// Celebration, interview, or commercial context, primary prominence, or
/// high viewer attention.
#[must_use]
pub fn is_high_impact(detection: &Detection) -> bool {
    detection
        .context_label()
        .is_some_and(|c| HIGH_IMPACT_CONTEXTS.contains(&c))
        || detection.prominence() == Some(Prominence::Primary)
        || detection.viewer_attention() == Some(ViewerAttention::High)
}
