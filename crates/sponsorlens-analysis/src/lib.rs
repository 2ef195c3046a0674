//! Brand sponsorship analysis pipeline.
//!
//! Turns loosely structured detections from an external vision service into
//! validated appearances, aggregates them into per-brand metrics with AI
//! enrichment, and merges several single-video reports onto one timeline.
//! External services are reached only through the traits in [`gateway`].

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod merger;
pub mod pipeline;
pub mod placement;
pub mod prompts;
pub mod validator;
pub mod weights;

#[cfg(test)]
mod test_support;

pub use aggregator::aggregate_brand;
pub use classifier::{categorize_sponsorship_placement, is_valid_brand};
pub use error::{AnalysisError, ValidationError};
pub use gateway::{
    AppearanceSummary, BoxFuture, BrandBackground, BrandSummaryItem, CollaboratorError,
    ContextualScore, DataSources, DetectionService, IntelligenceGateway, NoProgress,
    ProgressSink, ProgressUpdate, RoiAssessment, RoiProjection, ScoringInsights, ScoringRequest,
    SummaryRequest, VideoCatalog, VideoMetadata, WebSnippet,
};
pub use merger::merge_analyses;
pub use pipeline::{AnalysisMode, AnalysisPipeline};
pub use placement::{calculate_placement_effectiveness, PlacementEffectiveness};
pub use validator::{normalize_detection, validate};
pub use weights::WeightingPolicy;
